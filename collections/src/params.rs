//! Global parameters that can be set from environment variables.
//!
//! They tune debugging behaviour that is not worth exposing through the API of every constructor.
//! A parameter is read once, on first access: later changes to the environment are ignored.
//!
//! ```
//! use stepset::params::EnvParam;
//! static WIDTH: EnvParam<u32> = EnvParam::new("STEPSET_DOC_WIDTH", "4");
//!
//! // environment variable not set, using the default value
//! assert_eq!(WIDTH.get(), 4);
//! ```

use once_cell::sync::OnceCell;
use std::str::FromStr;

/// When set, ranges check during iteration that their step function is strictly increasing and panic
/// on the first violation. Can be overridden per range with
/// [`RangeBuilder::check_step`](crate::RangeBuilder::check_step).
pub static CHECK_STEP: EnvParam<bool> = EnvParam::new("STEPSET_CHECK_STEP", "false");

/// When set, the size of a range is always obtained by counting its elements, even when the step
/// function can derive it from the bounds.
pub static COUNT_BY_ITERATION: EnvParam<bool> = EnvParam::new("STEPSET_COUNT_BY_ITERATION", "false");

pub struct EnvParam<T> {
    value: OnceCell<T>,
    env: &'static str,
    default: &'static str,
}

impl<T> EnvParam<T> {
    /// Creates a parameter initialized from the environment variable `env`, or from `default` if the
    /// variable is unset or unparsable.
    pub const fn new(env: &'static str, default: &'static str) -> EnvParam<T> {
        EnvParam {
            value: OnceCell::new(),
            env,
            default,
        }
    }

    pub fn name(&self) -> &'static str {
        self.env
    }
}

impl<T: FromStr> EnvParam<T> {
    fn parse_default(&self) -> T {
        match T::from_str(self.default) {
            Ok(v) => v,
            Err(_) => panic!("[{}] invalid default value \"{}\"", self.env, self.default),
        }
    }

    fn read(&self) -> T {
        match std::env::var(self.env) {
            Ok(raw) => match T::from_str(raw.trim()) {
                Ok(value) => {
                    tracing::debug!(param = self.env, value = %raw, "parameter read from environment");
                    value
                }
                Err(_) => {
                    tracing::warn!(
                        param = self.env,
                        value = %raw,
                        default = self.default,
                        "could not parse parameter, using default"
                    );
                    self.parse_default()
                }
            },
            Err(std::env::VarError::NotPresent) => self.parse_default(),
            Err(err) => {
                tracing::warn!(param = self.env, %err, default = self.default, "using default");
                self.parse_default()
            }
        }
    }

    /// Returns the value of the parameter, reading it on first access.
    ///
    /// # Panic
    /// Panics if the variable is unset and the default value cannot be parsed.
    pub fn get(&self) -> T
    where
        T: Copy,
    {
        *self.get_ref()
    }

    pub fn get_ref(&self) -> &T {
        self.value.get_or_init(|| self.read())
    }

    /// Forces the value of the parameter.
    ///
    /// # Panic
    /// Panics if the parameter was already initialized, typically because it was already read.
    pub fn set(&self, value: T) {
        if self.value.set(value).is_err() {
            panic!("Parameter {} is already initialized (i.e. was previously accessed).", self.env);
        }
    }
}
