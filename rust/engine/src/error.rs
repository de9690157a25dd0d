// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for scan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a scan before traversal starts.
///
/// Per-instance extraction problems never surface here; they are
/// fault-isolated into [`crate::aggregate::Diagnostics`] and the scan
/// continues with siblings.
#[derive(Error, Debug)]
pub enum Error {
    #[error("no active assembly or objects: nothing to scan for a cut-list")]
    EmptyDocument,
}
