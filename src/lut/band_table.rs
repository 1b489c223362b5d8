use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use super::error::{LutError, TableLoadError};
use super::grid::{Axis, AxisKind, DomainPolicy};

pub const NDIM: usize = 5;
const NCORNERS: usize = 1 << NDIM;

const MAGIC: &[u8; 4] = b"ILUT";
const VERSION: u16 = 1;
// magic + version + one u32 length per axis
const HEADER_LEN: u64 = 4 + 2 + 4 * NDIM as u64;

/// Raw (a, b) pair stored at every grid node.
pub type CoefficientPair = [f64; 2];

/// Interpolated lookup table for one spectral band.
///
/// Nodes are stored row-major over the axes
/// `[solar_zenith][water_vapor][ozone][aot][altitude]`, altitude varying
/// fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct BandTable {
    band: String,
    axes: [Axis; NDIM],
    strides: [usize; NDIM],
    values: Vec<CoefficientPair>,
}

fn strides_for(axes: &[Axis; NDIM]) -> [usize; NDIM] {
    let mut strides = [1usize; NDIM];
    for d in (0..NDIM - 1).rev() {
        strides[d] = strides[d + 1] * axes[d + 1].len();
    }
    strides
}

impl BandTable {
    pub fn new(
        band: impl Into<String>,
        axes: [Axis; NDIM],
        values: Vec<CoefficientPair>,
    ) -> Result<Self, LutError> {
        for (axis, kind) in axes.iter().zip(AxisKind::ALL) {
            if axis.kind() != kind {
                return Err(LutError::InvalidAxis { axis: kind });
            }
        }

        let expected: usize = axes.iter().map(Axis::len).product();
        if values.len() != expected {
            return Err(LutError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }

        let strides = strides_for(&axes);
        Ok(Self {
            band: band.into(),
            axes,
            strides,
            values,
        })
    }

    /// Builds a table by evaluating `f` at every grid node.
    pub fn from_fn<F>(band: impl Into<String>, axes: [Axis; NDIM], f: F) -> Result<Self, LutError>
    where
        F: Fn([f64; NDIM]) -> CoefficientPair,
    {
        let strides = strides_for(&axes);
        let total: usize = axes.iter().map(Axis::len).product();

        let values = (0..total)
            .map(|flat| {
                let mut point = [0.0; NDIM];
                for d in 0..NDIM {
                    let i = (flat / strides[d]) % axes[d].len();
                    point[d] = axes[d].nodes()[i];
                }
                f(point)
            })
            .collect();

        Self::new(band, axes, values)
    }

    pub fn band(&self) -> &str {
        &self.band
    }

    pub fn axes(&self) -> &[Axis; NDIM] {
        &self.axes
    }

    /// Value stored at a node, addressed by per-axis node indices.
    pub fn node_value(&self, index: [usize; NDIM]) -> Option<CoefficientPair> {
        let mut offset = 0;
        for d in 0..NDIM {
            if index[d] >= self.axes[d].len() {
                return None;
            }
            offset += index[d] * self.strides[d];
        }
        self.values.get(offset).copied()
    }

    /// Multilinear interpolation of the (a, b) pair at `point`.
    ///
    /// `point` is `[solar_zenith, water_vapor, ozone, aot, altitude]`.
    /// Coordinates outside an axis are handled according to `policy`.
    pub fn interpolate(
        &self,
        point: [f64; NDIM],
        policy: DomainPolicy,
    ) -> Result<CoefficientPair, LutError> {
        let mut idx = [0usize; NDIM];
        let mut frac = [0.0f64; NDIM];
        for d in 0..NDIM {
            (idx[d], frac[d]) = self.axes[d].locate(point[d], policy)?;
        }

        // Gather the corners of the enclosing cell. Bit (NDIM - 1 - d) of the
        // corner number selects the upper node on axis d.
        let mut corners = [[0.0f64; 2]; NCORNERS];
        for (c, corner) in corners.iter_mut().enumerate() {
            let mut offset = 0;
            for d in 0..NDIM {
                let step = (c >> (NDIM - 1 - d)) & 1;
                let i = (idx[d] + step).min(self.axes[d].len() - 1);
                offset += i * self.strides[d];
            }
            *corner = self.values[offset];
        }

        // Remove one dimension at a time, altitude first
        let mut width = NCORNERS;
        for d in (0..NDIM).rev() {
            width /= 2;
            let r = frac[d];
            for k in 0..width {
                let lo = corners[2 * k];
                let hi = corners[2 * k + 1];
                corners[k] = [
                    (1.0 - r) * lo[0] + r * hi[0],
                    (1.0 - r) * lo[1] + r * hi[1],
                ];
            }
        }

        Ok(corners[0])
    }

    /// Reads a `.ilut` file and tags the table with `band`.
    pub fn read_from<P: AsRef<Path>>(path: P, band: &str) -> Result<Self, TableLoadError> {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let magic: [u8; 4] = read_array(&mut reader)?;
        if &magic != MAGIC {
            return Err(TableLoadError::Format("missing ILUT magic".to_string()));
        }

        let version = u16::from_le_bytes(read_array(&mut reader)?);
        if version != VERSION {
            return Err(TableLoadError::Format(format!(
                "unsupported table version {}",
                version
            )));
        }

        let mut lengths = [0usize; NDIM];
        for len in lengths.iter_mut() {
            *len = u32::from_le_bytes(read_array(&mut reader)?) as usize;
        }

        // Check the declared shape against the file size before allocating
        let node_count = lengths
            .iter()
            .try_fold(1u64, |acc, &n| acc.checked_mul(n as u64));
        let axis_total: u64 = lengths.iter().map(|&n| n as u64).sum();
        let expected_len = node_count
            .and_then(|n| n.checked_mul(16))
            .and_then(|v| v.checked_add(HEADER_LEN + 8 * axis_total));
        if expected_len != Some(file_len) {
            return Err(TableLoadError::Format(format!(
                "declared grid {:?} does not match file size {} bytes",
                lengths, file_len
            )));
        }

        let mut axis_nodes: Vec<Vec<f64>> = Vec::with_capacity(NDIM);
        for &len in &lengths {
            let mut nodes = Vec::with_capacity(len);
            for _ in 0..len {
                nodes.push(f64::from_le_bytes(read_array(&mut reader)?));
            }
            axis_nodes.push(nodes);
        }

        let axes: Vec<Axis> = axis_nodes
            .into_iter()
            .zip(AxisKind::ALL)
            .map(|(nodes, kind)| Axis::new(kind, nodes))
            .collect::<Result<_, _>>()?;
        let axes: [Axis; NDIM] = axes
            .try_into()
            .map_err(|_| TableLoadError::Format("expected five axes".to_string()))?;

        let total: usize = lengths.iter().product();
        let mut values = Vec::with_capacity(total);
        for node in 0..total {
            let a = f64::from_le_bytes(read_array(&mut reader)?);
            let b = f64::from_le_bytes(read_array(&mut reader)?);
            if !a.is_finite() || !b.is_finite() {
                return Err(TableLoadError::Format(format!(
                    "non-finite coefficients at node {}",
                    node
                )));
            }
            values.push([a, b]);
        }

        Ok(Self::new(band, axes, values)?)
    }

    /// Writes the table in the `.ilut` binary layout read by [`BandTable::read_from`].
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        for axis in &self.axes {
            writer.write_all(&(axis.len() as u32).to_le_bytes())?;
        }
        for axis in &self.axes {
            for node in axis.nodes() {
                writer.write_all(&node.to_le_bytes())?;
            }
        }
        for [a, b] in &self.values {
            writer.write_all(&a.to_le_bytes())?;
            writer.write_all(&b.to_le_bytes())?;
        }

        writer.flush()
    }
}

fn read_array<const N: usize>(reader: &mut impl Read) -> Result<[u8; N], TableLoadError> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => TableLoadError::Format("unexpected end of file".to_string()),
        _ => TableLoadError::Io(e),
    })?;
    Ok(buf)
}
