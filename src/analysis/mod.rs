/// Data organization for the station report service.
///
/// Submodules:
/// - `groupings` — partitions flat record lists by station identifier and
///   selects most-recent records under the timestamp ordering.

pub mod groupings;
