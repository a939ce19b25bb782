//! Status propagation over declarative schema trees.
//!
//! Registration-time helpers that stamp [`SchemaStatus`] values across a
//! [`SchemaBlock`]. All operations are immutable transforms: they take a
//! reference to a base tree and return a new one, so a default schema can be
//! shared across resources without aliasing hazards. The usual sequence is
//! broad-then-narrow: mark the whole tree once, then override individual
//! dotted paths. [`with_status_overrides`] packages that sequence as a
//! single call.

use thiserror::Error;

use shuffle_types::{SchemaBlock, SchemaKind, SchemaStatus};

/// Addressing failure while resolving a dotted schema path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaPathError {
    #[error("schema path '{path}' addresses unknown key '{segment}'")]
    KeyNotFound { path: String, segment: String },
    #[error("schema path '{path}' descends through '{segment}', which is not a nested block")]
    NotABlock { path: String, segment: String },
}

/// Return a copy of `block` with `status` assigned to every node.
///
/// Container nodes (nested blocks, scalar lists) always have their children
/// visited first and are themselves stamped only when `apply_to_containers`
/// is true. Passing `false` re-stamps every leaf while leaving container
/// nodes' prior status in place.
pub fn with_status(block: &SchemaBlock, status: SchemaStatus, apply_to_containers: bool) -> SchemaBlock {
    let mut updated = block.clone();
    apply_status(&mut updated, status, apply_to_containers);
    updated
}

fn apply_status(block: &mut SchemaBlock, status: SchemaStatus, apply_to_containers: bool) {
    for node in block.fields.values_mut() {
        if let SchemaKind::Block(nested) = &mut node.kind {
            apply_status(nested, status, apply_to_containers);
        }
        if !node.is_container() || apply_to_containers {
            node.status = status;
        }
    }
}

/// Return a copy of `block` with `status` assigned to the node addressed by a
/// dot-separated path (for example `"app.name"`).
///
/// The final path segment is always stamped; intermediate container nodes on
/// the path are stamped only when `apply_to_containers` is true. Addressing
/// errors produce no tree and leave the input untouched.
pub fn with_status_at(
    block: &SchemaBlock,
    path: &str,
    status: SchemaStatus,
    apply_to_containers: bool,
) -> Result<SchemaBlock, SchemaPathError> {
    let mut updated = block.clone();
    apply_status_at(&mut updated, path, path, status, apply_to_containers)?;
    Ok(updated)
}

fn apply_status_at(
    block: &mut SchemaBlock,
    path: &str,
    remainder: &str,
    status: SchemaStatus,
    apply_to_containers: bool,
) -> Result<(), SchemaPathError> {
    let (segment, rest) = match remainder.split_once('.') {
        Some((head, tail)) => (head, Some(tail)),
        None => (remainder, None),
    };

    let Some(node) = block.fields.get_mut(segment) else {
        return Err(SchemaPathError::KeyNotFound {
            path: path.to_string(),
            segment: segment.to_string(),
        });
    };

    match rest {
        None => node.status = status,
        Some(tail) => {
            let SchemaKind::Block(nested) = &mut node.kind else {
                return Err(SchemaPathError::NotABlock {
                    path: path.to_string(),
                    segment: segment.to_string(),
                });
            };
            apply_status_at(nested, path, tail, status, apply_to_containers)?;
            if apply_to_containers {
                node.status = status;
            }
        }
    }

    Ok(())
}

/// Stamp the whole tree with `base` (containers included), then apply each
/// `(path, status)` override in order, last write wins.
///
/// Overrides do not re-stamp intermediate containers on their path.
pub fn with_status_overrides(
    block: &SchemaBlock,
    base: SchemaStatus,
    overrides: &[(&str, SchemaStatus)],
) -> Result<SchemaBlock, SchemaPathError> {
    let mut updated = with_status(block, base, true);
    for (path, status) in overrides {
        updated = with_status_at(&updated, path, *status, false)?;
    }
    Ok(updated)
}
