use std::fs;

use approx::assert_relative_eq;
use skycat::catalogs::{catalog_from_sources, combine_catalogs, MagnitudeSystem, SourceCatalog};
use skycat::io::{read_catalog, write_catalog};
use skycat::surveys::{SurveyTable, TwoMassSource};
use skycat::SENTINEL_MAGNITUDE;
use tempfile::tempdir;

const TWOMASS_A: &str = "designation,ra,dec,j_m,h_m,k_m,ph_qual\n\
    00000001+0000001,10.0000,-5.0000,12.0,11.5,11.4,AAA\n\
    00000002+0000002,10.0010,-5.0010,13.0,,12.4,AUA\n\
    00000003+0000003,,-5.0020,14.0,13.5,13.4,AAA\n";

const TWOMASS_B: &str = "designation,ra,dec,j_m,h_m,k_m,ph_qual\n\
    00000004+0000004,10.0030,-5.0030,15.0,14.5,14.4,AAA\n";

#[test]
fn survey_tables_combine_and_survive_a_file_round_trip() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempdir().unwrap();
    let a_path = dir.path().join("twomass_a.csv");
    let b_path = dir.path().join("twomass_b.csv");
    fs::write(&a_path, TWOMASS_A).unwrap();
    fs::write(&b_path, TWOMASS_B).unwrap();

    let a_rows = TwoMassSource::load(&a_path).unwrap();
    let b_rows = TwoMassSource::load(&b_path).unwrap();
    assert_eq!(a_rows.len(), 2, "row without RA must be dropped");

    let columns = ["j_m", "h_m", "k_m"];
    let a = catalog_from_sources(&a_rows, "2MASS", &columns, MagnitudeSystem::Vegamag).unwrap();
    let b = catalog_from_sources(&b_rows, "2MASS", &columns, MagnitudeSystem::Vegamag).unwrap();
    let combined = combine_catalogs(&a, &b).unwrap();
    assert_eq!(combined.len(), 3);
    assert_eq!(
        combined.magnitude("2mass_h_m").unwrap().values,
        vec![11.5, SENTINEL_MAGNITUDE, 14.5]
    );

    let out = dir.path().join("combined.list");
    write_catalog(&combined, &out).unwrap();
    let back = read_catalog(&out).unwrap();

    assert_eq!(back.len(), 3);
    assert_eq!(
        back.magnitudes().keys().collect::<Vec<_>>(),
        vec!["2mass_j_m", "2mass_h_m", "2mass_k_m"]
    );
    for (x, y) in back.ra().iter().zip(combined.ra()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-8);
    }
    assert_eq!(back.magnitude("2mass_h_m").unwrap().values[1], SENTINEL_MAGNITUDE);
}
