//! Sortedness check for tooling.
//!
//! Lookup assumes every table is strictly sorted and never checks it. Images
//! that did not come from [`crate::ImageBuilder`] can be checked here.

use std::cmp::Ordering;

use crate::image::SymbolImage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("table `{table}`: `{name}` at {index} is out of order")]
    Unsorted {
        table: String,
        index: usize,
        name: String,
    },
    #[error("table `{table}`: `{name}` appears more than once")]
    Duplicate { table: String, name: String },
}

/// Check that every table is strictly ascending by name.
pub fn verify(image: &SymbolImage) -> Result<(), VerifyError> {
    for table in image.tables_with(image.direct_reader()).iter() {
        for i in 1..table.len() {
            let (Some(prev), Some(name)) = (table.entry(i - 1), table.symbol_name(i)) else {
                continue;
            };
            match table.compare_name(&prev, name.as_bytes()) {
                Ordering::Less => {}
                Ordering::Equal => {
                    return Err(VerifyError::Duplicate {
                        table: table.name(),
                        name,
                    });
                }
                Ordering::Greater => {
                    return Err(VerifyError::Unsorted {
                        table: table.name(),
                        index: i,
                        name,
                    });
                }
            }
        }
    }
    Ok(())
}
