/*!
# Saving density curves to CSV

Enable via the `csv` feature.
*/

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::density::DensityPair;
use crate::error::Result;

/**
Saves both curves of `pair` as a CSV file.

The file has a header row `x,base,tempered` followed by one row per grid point.

```rust
use tempered_density::io::csv::save_curves;
use tempered_density::{DensityPair, Grid};

let pair = DensityPair::compute(Grid::default(), 0.5).unwrap();
save_curves(&pair, "/tmp/densities.csv").expect("Expecting saving curves to succeed");
```
*/
pub fn save_curves<P: AsRef<Path>>(pair: &DensityPair, path: P) -> Result<()> {
    let mut wtr = Writer::from_writer(File::create(path.as_ref())?);
    wtr.write_record(["x", "base", "tempered"])?;
    for (x, a, b) in pair.rows() {
        wtr.write_record(&[x.to_string(), a.to_string(), b.to_string()])?;
    }
    wtr.flush()?;
    log::info!("saved {} rows to {}", pair.grid.len(), path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use approx::assert_abs_diff_eq;

    #[test]
    fn writes_header_and_one_row_per_point() {
        let pair = DensityPair::compute(Grid::default(), 0.5).unwrap();
        let file = tempfile::NamedTempFile::new().unwrap();
        save_curves(&pair, file.path()).unwrap();

        let mut rdr = csv::Reader::from_path(file.path()).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers, vec!["x", "base", "tempered"]);

        let rows: Vec<Vec<f64>> = rdr
            .records()
            .map(|r| r.unwrap().iter().map(|v| v.parse().unwrap()).collect())
            .collect();
        assert_eq!(rows.len(), 200);
        assert_abs_diff_eq!(rows[100][0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rows[100][1], pair.base.values()[100]);
        assert_abs_diff_eq!(rows[100][2], pair.tempered.values()[100]);
    }
}
