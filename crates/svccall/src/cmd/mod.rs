use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use svccall_parcel::WireType;
use svccall_schema::{ServiceCatalog, ServiceInterface};

use crate::exit::{io_error, schema_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod call;
pub mod decode;
pub mod describe;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Invoke a service method and print its typed result.
    Call(CallArgs),
    /// List the methods, codes and wire types of known services.
    Describe(DescribeArgs),
    /// Decode a saved `service call` reply.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Call(args) => call::run(args, format),
        Command::Describe(args) => describe::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Service-manager name (e.g. oem_lock).
    pub service: String,
    /// Method name as declared in the interface.
    pub method: String,
    /// One literal per declared argument; `byte[]` positions take any placeholder such as `-`.
    #[arg(allow_negative_numbers = true)]
    pub args: Vec<String>,
    #[command(flatten)]
    pub channel: ChannelArgs,
    #[command(flatten)]
    pub definition: DefinitionArgs,
}

#[derive(Args, Debug)]
pub struct ChannelArgs {
    /// TCP address of the shell channel.
    #[arg(long, env = "SVCCALL_ADDR", default_value = "127.0.0.1:1234")]
    pub addr: String,
    /// Connect to a Unix domain socket instead of TCP.
    #[arg(long, value_name = "PATH", conflicts_with = "addr")]
    pub unix: Option<PathBuf>,
    /// Give up waiting for a reply after this long (e.g. 5s, 500ms). Default: wait forever.
    #[arg(long)]
    pub read_timeout: Option<String>,
    /// Maximum reply size taken in the single read.
    #[arg(long, default_value_t = svccall_dispatch::DEFAULT_MAX_REPLY_SIZE)]
    pub max_reply_size: usize,
    /// Don't send a newline to clear partially typed input before the call.
    #[arg(long)]
    pub no_prime: bool,
}

#[derive(Args, Debug, Default)]
pub struct DefinitionArgs {
    /// Extra AIDL definition file.
    #[arg(long, value_name = "FILE", requires = "interface", requires = "bind_as")]
    pub aidl: Option<PathBuf>,
    /// Interface to take from the AIDL file.
    #[arg(long, value_name = "NAME", requires = "aidl")]
    pub interface: Option<String>,
    /// Service-manager name to bind the interface under.
    #[arg(long = "as", value_name = "SERVICE", requires = "aidl")]
    pub bind_as: Option<String>,
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Only describe this service.
    pub service: Option<String>,
    #[command(flatten)]
    pub definition: DefinitionArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File holding the reply text. Reads stdin when omitted.
    pub file: Option<PathBuf>,
    /// Decode status word and a value of this type.
    #[arg(long, value_name = "TYPE")]
    pub return_type: Option<WireTypeArg>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum WireTypeArg {
    Void,
    Int32,
    Int64,
    Bool,
    String,
}

impl From<WireTypeArg> for WireType {
    fn from(arg: WireTypeArg) -> Self {
        match arg {
            WireTypeArg::Void => WireType::Void,
            WireTypeArg::Int32 => WireType::Int32,
            WireTypeArg::Int64 => WireType::Int64,
            WireTypeArg::Bool => WireType::Bool,
            WireTypeArg::String => WireType::String,
        }
    }
}

/// Built-in services plus the one described by `--aidl`, if any.
pub fn load_catalog(definition: &DefinitionArgs) -> CliResult<ServiceCatalog> {
    let mut catalog =
        ServiceCatalog::builtin().map_err(|err| schema_error("built-in definitions", err))?;

    if let (Some(path), Some(interface), Some(service)) =
        (&definition.aidl, &definition.interface, &definition.bind_as)
    {
        let source = std::fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        let bound = ServiceInterface::from_aidl(service.as_str(), &source, interface)
            .map_err(|err| schema_error(&format!("{}", path.display()), err))?;
        tracing::debug!(service, interface, "bound extra definition");
        catalog.insert(bound);
    }

    Ok(catalog)
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;
    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration(" ").is_err());
    }

    #[test]
    fn builtin_catalog_without_extra_definition() {
        let catalog = load_catalog(&DefinitionArgs::default()).unwrap();
        assert!(catalog.get("oem_lock").is_ok());
    }

    #[test]
    fn missing_definition_file_is_reported() {
        let definition = DefinitionArgs {
            aidl: Some(PathBuf::from("/nonexistent/IThing.aidl")),
            interface: Some("IThing".into()),
            bind_as: Some("thing".into()),
        };
        let err = load_catalog(&definition).unwrap_err();
        assert!(err.message.contains("/nonexistent/IThing.aidl"));
    }
}
