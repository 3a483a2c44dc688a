//! Internal events reported back to the engine by spawned tasks.

use crate::host::DocumentId;
use crate::scan::ScanOutcome;

/// Completion message from debounce and scan tasks.
///
/// Tasks never touch engine state; they only send one of these and exit.
#[derive(Debug)]
pub enum EngineEvent {
	/// A debounce timer of `doc` ran out without being reset.
	DebounceElapsed { doc: DocumentId, generation: u64 },
	/// A rescan of `doc` stamped `version` finished. `outcome` is `None` when
	/// the scan was cancelled before completing.
	ScanFinished {
		doc: DocumentId,
		version: u64,
		outcome: Option<ScanOutcome>,
	},
}
