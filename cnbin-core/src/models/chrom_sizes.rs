use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use log::debug;

use crate::errors::{CnBinError, Result};
use crate::models::{Bin, Region};
use crate::utils::{chrom_karyotype_key, get_dynamic_reader};

///
/// Reference chromosome sizes, kept in karyotypic order.
///
#[derive(Debug, Clone, Default)]
pub struct ChromSizes {
    chroms: Vec<(String, u32)>,
    lookup: HashMap<String, usize>,
}

impl ChromSizes {
    pub fn get(&self, chr: &str) -> Option<u32> {
        self.lookup.get(chr).map(|&i| self.chroms[i].1)
    }

    pub fn contains(&self, chr: &str) -> bool {
        self.lookup.contains_key(chr)
    }

    pub fn len(&self) -> usize {
        self.chroms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chroms.is_empty()
    }

    /// Chromosome names and sizes in karyotypic order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.chroms.iter().map(|(chr, size)| (chr.as_str(), *size))
    }

    ///
    /// Partition the genome into contiguous, non-overlapping bins of `bin_width` base pairs.
    ///
    /// Chromosomes are tiled in karyotypic order, or in the order given by `chroms` when it
    /// is supplied. The last bin of each chromosome is truncated at the chromosome end.
    /// Bin indices run across the whole genome.
    ///
    /// # Arguments
    /// - bin_width: nominal width of every bin
    /// - chroms: restrict tiling to these chromosomes
    pub fn tile(&self, bin_width: u32, chroms: Option<&[String]>) -> Result<Vec<Bin>> {
        if bin_width == 0 {
            return Err(CnBinError::Configuration(
                "bin width must be greater than zero".to_string(),
            ));
        }

        let selected: Vec<(&str, u32)> = match chroms {
            Some(names) => names
                .iter()
                .map(|name| {
                    self.get(name).map(|size| (name.as_str(), size)).ok_or_else(|| {
                        CnBinError::Configuration(format!(
                            "chromosome {name} is not present in the chromosome size table"
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => self.iter().collect(),
        };

        let mut bins = Vec::new();
        for (chr, size) in selected {
            let mut start: u32 = 0;
            while start < size {
                let end = start.saturating_add(bin_width).min(size);
                bins.push(Bin {
                    index: bins.len(),
                    region: Region {
                        chr: chr.to_string(),
                        start,
                        end,
                    },
                });
                start = end;
            }
        }

        debug!("Tiled {} bins of width {}", bins.len(), bin_width);
        Ok(bins)
    }
}

impl From<Vec<(String, u32)>> for ChromSizes {
    fn from(mut chroms: Vec<(String, u32)>) -> Self {
        chroms.sort_by_key(|(chr, _)| chrom_karyotype_key(chr));
        chroms.dedup_by(|a, b| a.0 == b.0);
        let lookup = chroms
            .iter()
            .enumerate()
            .map(|(i, (chr, _))| (chr.clone(), i))
            .collect();
        ChromSizes { chroms, lookup }
    }
}

impl TryFrom<&Path> for ChromSizes {
    type Error = CnBinError;

    ///
    /// Read a `chrom.sizes` style file: one `name size` pair per line, whitespace separated.
    ///
    fn try_from(value: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(value)?;
        let mut chroms: Vec<(String, u32)> = Vec::new();
        let mut seen: HashMap<String, u32> = HashMap::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            let (Some(chr), Some(size)) = (fields.next(), fields.next()) else {
                return Err(CnBinError::Parse(format!("chromosome size line: {line}")));
            };
            let size = size
                .parse::<u32>()
                .map_err(|_| CnBinError::Parse(format!("chromosome size line: {line}")))?;

            match seen.get(chr) {
                Some(&previous) if previous != size => {
                    return Err(CnBinError::Configuration(format!(
                        "chromosome {chr} listed with sizes {previous} and {size}"
                    )));
                }
                Some(_) => continue,
                None => {
                    seen.insert(chr.to_string(), size);
                    chroms.push((chr.to_string(), size));
                }
            }
        }

        Ok(ChromSizes::from(chroms))
    }
}

impl TryFrom<&str> for ChromSizes {
    type Error = CnBinError;

    fn try_from(value: &str) -> Result<Self> {
        ChromSizes::try_from(Path::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::path::PathBuf;

    fn get_test_path(file_name: &str) -> PathBuf {
        std::env::current_dir()
            .unwrap()
            .join("../tests/data")
            .join(file_name)
    }

    #[fixture]
    fn sizes() -> ChromSizes {
        ChromSizes::from(vec![
            ("chr2".to_string(), 1_500_000),
            ("chr1".to_string(), 2_000_000),
            ("chrX".to_string(), 999_999),
        ])
    }

    #[rstest]
    fn test_tile_partitions_each_chromosome(sizes: ChromSizes) {
        let bins = sizes.tile(1_000_000, None).unwrap();

        let coords: Vec<(&str, u32, u32)> = bins
            .iter()
            .map(|b| (b.chr(), b.region.start, b.region.end))
            .collect();
        assert_eq!(
            coords,
            vec![
                ("chr1", 0, 1_000_000),
                ("chr1", 1_000_000, 2_000_000),
                ("chr2", 0, 1_000_000),
                ("chr2", 1_000_000, 1_500_000),
                ("chrX", 0, 999_999),
            ]
        );
        let indices: Vec<usize> = bins.iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[rstest]
    fn test_tile_bins_cover_chromosome_exactly(sizes: ChromSizes) {
        let bins = sizes.tile(300_000, None).unwrap();
        for (chr, size) in sizes.iter() {
            let total: u32 = bins
                .iter()
                .filter(|b| b.chr() == chr)
                .map(|b| b.width())
                .sum();
            assert_eq!(total, size);
        }
    }

    #[rstest]
    fn test_tile_selected_chromosomes_keep_given_order(sizes: ChromSizes) {
        let chroms = vec!["chrX".to_string(), "chr2".to_string()];
        let bins = sizes.tile(1_000_000, Some(&chroms)).unwrap();
        let chrs: Vec<&str> = bins.iter().map(|b| b.chr()).collect();
        assert_eq!(chrs, vec!["chrX", "chr2", "chr2"]);
    }

    #[rstest]
    fn test_tile_unknown_chromosome_is_configuration_error(sizes: ChromSizes) {
        let chroms = vec!["chr22".to_string()];
        let result = sizes.tile(1_000_000, Some(&chroms));
        assert!(matches!(result, Err(CnBinError::Configuration(_))));
    }

    #[rstest]
    fn test_tile_zero_width_is_configuration_error(sizes: ChromSizes) {
        assert!(matches!(
            sizes.tile(0, None),
            Err(CnBinError::Configuration(_))
        ));
    }

    #[rstest]
    fn test_read_chrom_sizes_file() {
        let path = get_test_path("chrom.sizes");
        let sizes = ChromSizes::try_from(path.as_path()).unwrap();
        assert_eq!(sizes.len(), 3);
        assert_eq!(sizes.get("chr1"), Some(3_000_000));
        assert_eq!(sizes.get("chr2"), Some(2_500_000));
        assert_eq!(sizes.get("chrX"), Some(1_200_000));
        assert!(!sizes.contains("chr3"));
    }
}
