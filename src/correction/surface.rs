use super::{BandImages, CorrectedImage, SkipReason, SkippedBand};
use crate::emulator::CorrectionCoefficients;

/// Applies `(radiance - a) / b` to every band that has usable coefficients.
///
/// Bands without coefficients are left out of the output and listed in
/// [`CorrectedImage::skipped`].
pub fn surface_reflectance(
    radiance: &BandImages,
    coefficients: &CorrectionCoefficients,
) -> CorrectedImage {
    radiance
        .iter()
        .fold(CorrectedImage::default(), |mut image, (band, pixels)| {
            match coefficients.get(band) {
                Some(c) if c.is_usable() => {
                    let surface = pixels.iter().map(|&l| c.apply(l)).collect();
                    image.bands.insert(band.clone(), surface);
                }
                Some(_) => image.skipped.push(SkippedBand {
                    band: band.clone(),
                    reason: SkipReason::DegenerateCoefficients,
                }),
                None => image.skipped.push(SkippedBand {
                    band: band.clone(),
                    reason: SkipReason::MissingCoefficients,
                }),
            }
            image
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::Coefficients;

    fn coefficients() -> CorrectionCoefficients {
        [
            ("B2".to_string(), Coefficients { a: 20.0, b: 100.0 }),
            ("B3".to_string(), Coefficients { a: 10.0, b: 0.0 }),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_missing_bands_are_omitted_not_zeroed() {
        let radiance = BandImages::from([
            ("B2".to_string(), vec![20.0, 45.0]),
            ("B3".to_string(), vec![30.0]),
            ("B5".to_string(), vec![30.0]),
        ]);

        let image = surface_reflectance(&radiance, &coefficients());
        assert_eq!(image.bands.len(), 1);
        assert_eq!(image.bands["B2"], vec![0.0, 0.25]);
        assert_eq!(
            image.skipped,
            vec![
                SkippedBand {
                    band: "B3".to_string(),
                    reason: SkipReason::DegenerateCoefficients
                },
                SkippedBand {
                    band: "B5".to_string(),
                    reason: SkipReason::MissingCoefficients
                },
            ]
        );
    }
}
