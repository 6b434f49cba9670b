use structopt::StructOpt;

use super::Config;
use crate::logging::Level;

/// Expands to a `fn main` that parses `$sopt` from the command line and runs
/// `$body` inside an `App` built from the `CommonArgs` field (`common` unless
/// given as `@field`).
#[macro_export]
macro_rules! main {
    (|$args:ident: $sopt:ty, $ctx:ident: Context| $body:block; @$field:ident) => {
        fn main() {
            let $args = <$sopt as $crate::app::StructOpt>::from_args();
            $crate::app::App::from_config($args.$field.clone())
                .main(move |$ctx: $crate::app::Context| $body)
                .run();
        }
    };
    (|$args:ident: $sopt:ty, $ctx:ident: Context| $body:block) => {
        $crate::main!(|$args: $sopt, $ctx: Context| $body; @common);
    };
    (|$args:ident: $sopt:ty, $ctx:ident: Context| $body:expr) => {
        $crate::main!(|$args: $sopt, $ctx: Context| { $body });
    };
}

#[derive(StructOpt, Debug, Clone)]
pub struct CommonArgs {
    /// Activate debug mode
    #[structopt(short = "d", long = "debug")]
    pub debug: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    pub verbose: u8,

    /// Directory to write a log file into
    #[structopt(long = "logdir")]
    pub logdir: Option<String>,
}

impl From<CommonArgs> for Config {
    fn from(c: CommonArgs) -> Config {
        let mut config = Config::default();
        config.logging.verbosity = match (c.debug, c.verbose) {
            (_, v) if v >= 2 => Level::Trace,
            (true, _) | (_, 1) => Level::Debug,
            _ => Level::Info,
        };
        config.logging.logdir = c.logdir;
        config.logging.mkdir = true;
        config
    }
}
