//! Reserved configuration keys and semantic type names

/// Field names of a single input/output/parameter record
pub mod field {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const UNIT: &str = "unit";
    pub const NAMESPACE: &str = "namespace";
    pub const DESCRIPTION: &str = "description";
    pub const DEFAULT: &str = "default";
    pub const MODIFIER: &str = "modifier";

    /// Every record field, in declaration order
    pub const ALL: [&str; 8] = [ID, NAME, TYPE, UNIT, NAMESPACE, DESCRIPTION, DEFAULT, MODIFIER];
}

/// The three list-valued keys a model configuration may carry
pub mod collection {
    pub const INPUTS: &str = "inputs";
    pub const OUTPUTS: &str = "outputs";
    pub const PARAMETERS: &str = "parameters";
}

/// Wire-level semantic types (`"type"` field values)
pub mod types {
    pub const BOOL: &str = "bool";
    pub const BYTES: &str = "bytes";
    pub const STRING: &str = "string";
    pub const INT_8: &str = "int8";
    pub const INT_16: &str = "int16";
    pub const INT_32: &str = "int32";
    pub const INT_64: &str = "int64";
    pub const UINT_8: &str = "uint8";
    pub const UINT_16: &str = "uint16";
    pub const UINT_32: &str = "uint32";
    pub const UINT_64: &str = "uint64";
    pub const FLOAT_32: &str = "float32";
    pub const FLOAT_64: &str = "float64";

    // FEM engine composite types
    pub const FORCE: &str = "force";
    pub const FIXTURE: &str = "fixture";
    pub const MATERIAL: &str = "material";
}

/// Placeholder text used for every field of the sentinel loop record
pub const SENTINEL: &str = "Invalid";

/// `DTIG_TYPE_<suffix>` constants and the text they resolve to
pub const TYPE_CONSTANTS: &[(&str, &str)] = &[
    ("BOOL", types::BOOL),
    ("BYTES", types::BYTES),
    ("STRING", types::STRING),
    ("INT_8", types::INT_8),
    ("INT_16", types::INT_16),
    ("INT_32", types::INT_32),
    ("INT_64", types::INT_64),
    ("UINT_8", types::UINT_8),
    ("UINT_16", types::UINT_16),
    ("UINT_32", types::UINT_32),
    ("UINT_64", types::UINT_64),
    ("FLOAT_32", types::FLOAT_32),
    ("FLOAT_64", types::FLOAT_64),
    ("FORCE", types::FORCE),
    ("FIXTURE", types::FIXTURE),
    ("MATERIAL", types::MATERIAL),
    ("PROP_VALUE", "value"),
    ("PROP_STATE", "state"),
    ("PROP_NAME", "name"),
    ("PROP_YOUNGS_MODULUS", "youngs_modulus"),
    ("PROP_POISSON_RATIO", "poisson_ratio"),
    ("PROP_DENSITY", "density"),
    ("PROP_REFERENCE", "reference"),
    ("PROP_OBJECT", "object"),
    ("PROP_MAGNITUDE", "magnitude"),
    ("PROP_DIRECTION", "direction"),
];

/// `DTIG_FORMALISM_<suffix>` constants
pub const FORMALISM_CONSTANTS: &[(&str, &str)] = &[
    ("DISCRETE", "discrete"),
    ("CONTINUOUS", "continuous"),
    ("FEM", "fem"),
];

/// `DTIG_<suffix>` names that read a top-level configuration key
pub const CONFIG_KEYS: &[(&str, &str)] = &[
    ("CLIENT", "client"),
    ("SERVER", "server"),
    ("ID", "id"),
    ("TYPE", "type"),
    ("UNIT", "unit"),
    ("STEP", "step"),
    ("NAME", "name"),
    ("AUTHORS", "authors"),
    ("VERSION", "version"),
    ("FORMALISM", "formalism"),
    ("LOOKAHEAD", "lookahead"),
    ("DESCRIPTION", "description"),
    ("MINIMUM_STEP", "minimumstep"),
    ("SUPER_DENSE_TIME", "superdensetime"),
    ("IMPORTS", "imports"),
    ("RUN", "run"),
    ("MAIN", "main"),
    ("STATES", "states"),
    ("CLASS_NAME", "classname"),
    ("CONSTRUCTOR", "constructor"),
    ("DESTRUCTOR", "destructor"),
    ("MESSAGE_HANDLER", "messagehandler"),
    ("RUN_SERVER", "runserver"),
    ("RUN_CLIENT", "runclient"),
    ("RUN_MODEL", "runmodel"),
    ("METHOD", "method"),
    ("PARSE", "parse"),
    ("CALLBACK", "callback"),
    ("STOP", "stop"),
    ("START", "start"),
    ("SET_INPUT", "set_input"),
    ("GET_OUTPUT", "get_output"),
    ("SET_PARAMETER", "set_parameter"),
    ("GET_PARAMETER", "get_parameter"),
    ("ADVANCE", "advance"),
    ("INITIALIZE", "initialize"),
    ("MODEL_INFO", "model_info"),
    ("BODY", "body"),
    ("SELF", "self"),
    ("MEMBER", "member"),
    ("PRIVATE", "private"),
    ("PUBLIC", "public"),
    ("NEW", "new"),
    ("INHERIT", "inherit"),
    ("PUBLISH", "publish"),
    ("SUBSCRIBE", "subscribe"),
    ("NAMESPACE", "namespace"),
];

/// Look up a suffix in one of the constant tables above
pub fn lookup(table: &[(&str, &'static str)], suffix: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(name, _)| *name == suffix)
        .map(|(_, value)| *value)
}
