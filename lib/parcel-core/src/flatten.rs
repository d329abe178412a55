//! Flattening of nested parameter structures into `(key, value)` pairs.
//!
//! Nesting is written with bracket suffixes: a mapping entry `b` under `a`
//! becomes `a[b]`, every element of a sequence under `a` becomes `a[]`
//! (indices are not written). Traversal is depth-first in insertion order.
//!
//! ```
//! use parcel_core::{flatten, params};
//!
//! let pairs = flatten(&params! { "a" => params! { "b" => [1, 2] } }).expect("no attachments");
//! assert_eq!(
//!     pairs,
//!     [("a[b][]".to_string(), "1".to_string()), ("a[b][]".to_string(), "2".to_string())]
//! );
//! ```

use crate::{Error, ParameterValue, Parameters, Part, Result};

/// A flattened `(bracketed-key, value)` pair.
pub type Pair = (String, String);

/// Flatten one parameter mapping.
///
/// # Errors
///
/// Returns [`Error::UnsupportedAttachment`] if an attachment appears
/// anywhere in the structure.
pub fn flatten(parameters: &Parameters) -> Result<Vec<Pair>> {
    flatten_all([parameters])
}

/// Flatten several parameter mappings, concatenating their pairs in order.
///
/// # Errors
///
/// Returns [`Error::UnsupportedAttachment`] if an attachment appears
/// anywhere in the structures.
pub fn flatten_all<'a>(sets: impl IntoIterator<Item = &'a Parameters>) -> Result<Vec<Pair>> {
    let mut flattener = Flattener::rejecting_attachments();
    for parameters in sets {
        flattener.visit_mapping(None, parameters)?;
    }
    Ok(flattener.pairs)
}

/// Flatten a mapping for multipart encoding.
///
/// Attachments are pulled out of the tree instead of rejected; each one is
/// renamed to the bracketed key it was found at.
pub(crate) fn flatten_with_attachments(parameters: &Parameters) -> Result<(Vec<Pair>, Vec<Part>)> {
    let mut flattener = Flattener::collecting_attachments();
    flattener.visit_mapping(None, parameters)?;
    Ok((flattener.pairs, flattener.attachments))
}

struct Flattener {
    pairs: Vec<Pair>,
    attachments: Vec<Part>,
    collect_attachments: bool,
}

impl Flattener {
    const fn rejecting_attachments() -> Self {
        Self {
            pairs: Vec::new(),
            attachments: Vec::new(),
            collect_attachments: false,
        }
    }

    const fn collecting_attachments() -> Self {
        Self {
            pairs: Vec::new(),
            attachments: Vec::new(),
            collect_attachments: true,
        }
    }

    /// Top-level keys are used as-is; nested keys are bracketed.
    fn visit_mapping(&mut self, prefix: Option<&str>, parameters: &Parameters) -> Result<()> {
        for (key, value) in parameters.iter() {
            let key = match prefix {
                Some(prefix) => format!("{prefix}[{key}]"),
                None => key.to_string(),
            };
            self.visit(key, value)?;
        }
        Ok(())
    }

    fn visit(&mut self, key: String, value: &ParameterValue) -> Result<()> {
        match value {
            ParameterValue::Scalar(scalar) => self.pairs.push((key, scalar.to_string())),
            ParameterValue::Mapping(parameters) => self.visit_mapping(Some(&key), parameters)?,
            ParameterValue::Sequence(items) => {
                let item_key = format!("{key}[]");
                for item in items {
                    self.visit(item_key.clone(), item)?;
                }
            }
            ParameterValue::Attachment(part) => {
                if !self.collect_attachments {
                    return Err(Error::unsupported_attachment(key));
                }
                self.attachments.push(part.clone().with_name(key));
            }
        }
        Ok(())
    }
}
