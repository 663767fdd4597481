use clap::ValueEnum;

/// When to colorize terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    /// Let the terminal decide
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Applies the choice to the `colored` crate for the rest of the process.
    pub fn apply(self) {
        match self {
            ColorMode::Always => colored::control::set_override(true),
            ColorMode::Never => colored::control::set_override(false),
            ColorMode::Auto => colored::control::unset_override(),
        }
    }
}
