// -
// Engine administrative API paths

/// Leader probe endpoint on the local engine
pub(crate) const CAT_MASTER_PATH: &str = "/_cat/master";

/// Cluster-wide index listing, narrowed to the two columns the reconciler reads
pub(crate) const CAT_INDICES_PATH: &str = "/_cat/indices?format=json&h=index,status";

/// Position of the leader's address in the whitespace-delimited `_cat/master`
/// line (`id host ip node`). Known fragility of the probe format; this
/// constant is the single point to change if the engine layout shifts.
pub(crate) const MASTER_ADDRESS_FIELD: usize = 2;

/// Deployment-group naming convention: only groups whose lowercase name
/// contains this tag can ever hold the master role.
pub(crate) const MASTER_GROUP_TAG: &str = "master";
