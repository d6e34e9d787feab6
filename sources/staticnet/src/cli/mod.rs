pub(crate) mod compile;
pub(crate) mod info;
pub(crate) mod steps;
pub(crate) mod to_form;
pub(crate) mod validate;

pub(crate) use compile::CompileArgs;
pub(crate) use info::InfoArgs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use snafu::ResultExt;
use std::fs;
use std::path::Path;
pub(crate) use steps::StepsArgs;
pub(crate) use to_form::ToFormArgs;
pub(crate) use validate::ValidateArgs;

/// Helper function that reads a JSON file into `T`
fn read_json<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let s = fs::read_to_string(path).context(error::InputReadSnafu { path })?;
    serde_json::from_str(&s).context(error::JsonDeserializeSnafu { path })
}

/// Helper function that serializes the input to JSON and prints it
fn print_json<S>(val: &S) -> Result<()>
where
    S: Serialize + ?Sized,
{
    let output = serde_json::to_string_pretty(val).context(error::JsonSerializeSnafu)?;
    println!("{}", output);
    Ok(())
}

/// Potential errors during staticnet execution
pub(crate) mod error {
    use snafu::Snafu;
    use std::io;
    use std::path::PathBuf;

    #[derive(Debug, Snafu)]
    #[snafu(visibility(pub(crate)))]
    pub(crate) enum Error {
        #[snafu(display("Unable to compile static network configuration: {}", source))]
        Compile { source: staticnet::reconcile::Error },

        #[snafu(display("Unable to load configuration: {}", source))]
        Config { source: staticnet::config::Error },

        #[snafu(display("Unable to read '{}': {}", path.display(), source))]
        InputRead { path: PathBuf, source: io::Error },

        #[snafu(display("Unable to parse JSON from '{}': {}", path.display(), source))]
        JsonDeserialize {
            path: PathBuf,
            source: serde_json::Error,
        },

        #[snafu(display("Error serializing to JSON: {}", source))]
        JsonSerialize { source: serde_json::Error },

        #[snafu(display("Logger setup error: {}", source))]
        Logger { source: log::SetLoggerError },

        #[snafu(display("Static IP values have {} invalid field(s): {}", count, source))]
        Invalid {
            count: usize,
            source: staticnet::ValidationErrors,
        },
    }
}

pub(crate) type Result<T> = std::result::Result<T, error::Error>;
