use sixs_emulator::lut::TableLayout;
use sixs_emulator::{AerosolProfile, Emulator, Mission, PhysicalInputs, TableStore};

fn main() {
    let layout = TableLayout::new(Mission::Sentinel2A, AerosolProfile::Continental, 0);
    let store = TableStore::load_layout("./files/iLUTs", &layout).unwrap();

    let inputs = PhysicalInputs::new(30.0, 2.0, 0.3, 0.1, 0.1, 100.0);
    let cc = Emulator::new(&store).run(&inputs).unwrap();

    for (band, c) in cc.iter() {
        println!("{band}: a = {:.4}, b = {:.4}", c.a, c.b);
    }
}
