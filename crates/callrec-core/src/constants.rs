/// Smallest probability any CPT cell may hold.
pub const P_MIN: f64 = 0.0001;

/// Largest probability any CPT cell may hold.
pub const P_MAX: f64 = 1.0 - P_MIN;

/// Tolerance used when checking that a CPT row sums to one.
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Decimal places kept for availability probabilities (rounded toward -inf).
pub const AVAILABILITY_PRECISION: u32 = 3;

/// Decimal places kept for pattern probabilities (rounded toward -inf).
pub const PATTERN_PRECISION: u32 = 4;

/// Identifier of the synthetic context that absorbs sparse contexts.
pub const UNKNOWN_CONTEXT: &str = "LUnknown.method()V";

/// Outcome name of the synthetic "object not used by any pattern" pattern.
pub const NONE_PATTERN: &str = "none";

/// Node names of the fixed layers.
pub const CONTEXT_NODE: &str = "context";
pub const AVAILABILITY_NODE: &str = "availability";
pub const PATTERN_NODE: &str = "patterns";

/// Outcome names of binary nodes.
pub const STATE_TRUE: &str = "true";
pub const STATE_FALSE: &str = "false";

/// Method names that denote constructors.
pub const CONSTRUCTOR_NAMES: [&str; 2] = ["<init>", "<subtype-init>"];
