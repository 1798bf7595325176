// -----------------------------------------------------------------------------
// NumberHandling

/// How non-finite floats are carried on the wire.
///
/// The standard JSON number grammar has no spelling for NaN or the
/// infinities, so they either travel as the string tokens `"NaN"`,
/// `"Infinity"` and `"-Infinity"`, or are rejected outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NumberHandling {
    /// Non-finite values are a hard error in both directions.
    Strict,
    /// Non-finite values are written and read as named string tokens.
    #[default]
    AllowNamedFloatLiterals,
}

impl NumberHandling {
    #[inline]
    pub const fn allows_named_literals(self) -> bool {
        matches!(self, Self::AllowNamedFloatLiterals)
    }
}

// -----------------------------------------------------------------------------
// CodecOptions

/// Construction-time configuration of a [`Reflector`](crate::Reflector).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    pub number_handling: NumberHandling,
    /// Members nested deeper than this are skipped with a warning.
    pub max_depth: usize,
}

impl CodecOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    pub const fn new() -> Self {
        Self {
            number_handling: NumberHandling::AllowNamedFloatLiterals,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    #[inline]
    pub const fn with_number_handling(mut self, number_handling: NumberHandling) -> Self {
        self.number_handling = number_handling;
        self
    }

    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for CodecOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
