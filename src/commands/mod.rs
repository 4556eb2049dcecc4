use etckit::defaults::Defaults;

pub type CmdResult<T> = etckit::Result<(T, i32)>;

/// Context shared by every command: the merged defaults from etckit.json.
pub(crate) struct GlobalArgs {
    pub defaults: Defaults,
}

impl GlobalArgs {
    pub fn load() -> Self {
        Self {
            defaults: etckit::defaults::load_defaults(),
        }
    }
}

pub mod config;
pub mod date;
pub mod deep;
pub mod rehash;
pub mod text;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (etckit::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Text(args) => dispatch!(args, global, text),
        crate::Commands::Deep(args) => dispatch!(args, global, deep),
        crate::Commands::Date(args) => dispatch!(args, global, date),
        crate::Commands::Rehash(args) => dispatch!(args, global, rehash),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
