use std::io::{ErrorKind, Read, Write};

use svccall_parcel::{decode_record_dump, ParcelValue};
use svccall_schema::ServiceInterface;
use tracing::{debug, info, warn};

use crate::command::build_command;
use crate::config::DispatchConfig;
use crate::error::{DispatchError, Result};

/// Issues schema-checked `service call` commands over a shell channel.
///
/// The caller owns the channel; dropping the `ServiceCaller` drops it, and
/// [`ServiceCaller::into_inner`] hands it back. Pass `&mut stream` to keep
/// ownership outside.
pub struct ServiceCaller<C> {
    channel: C,
    config: DispatchConfig,
}

impl<C: Read + Write> ServiceCaller<C> {
    /// Create a caller with default configuration.
    pub fn new(channel: C) -> Self {
        Self::with_config(channel, DispatchConfig::default())
    }

    /// Create a caller with explicit configuration.
    pub fn with_config(channel: C, config: DispatchConfig) -> Self {
        Self { channel, config }
    }

    /// Invoke `method` on `service` and return its value.
    ///
    /// Returns `Ok(None)` for methods declared `void`. A nonzero status word
    /// becomes [`DispatchError::RemoteStatus`]. Nothing is retried; after an
    /// error the channel may still hold part of a reply.
    pub fn call(
        &mut self,
        service: &ServiceInterface,
        method: &str,
        arguments: &[ParcelValue],
    ) -> Result<Option<ParcelValue>> {
        let schema = service.registry.method(method)?;
        let tokens = schema.encode_arguments(arguments)?;
        let command = build_command(
            &self.config.invoke_command,
            &service.service,
            schema.code,
            &tokens,
        );

        debug!(command = command.trim_end(), "sending service call");
        self.write_all(command.as_bytes())?;
        let reply = self.read_reply()?;

        let raw = decode_record_dump(&reply)?;
        debug!(reply_bytes = raw.len(), "decoded reply parcel");
        let decoded = schema.decode_return(&raw)?;

        let signature = format_call(method, arguments);
        if decoded.status != 0 {
            warn!(call = %signature, status = decoded.status, "service call failed");
            return Err(DispatchError::RemoteStatus {
                method: method.to_string(),
                arguments: arguments.to_vec(),
                status: decoded.status,
            });
        }

        match &decoded.value {
            Some(value) => info!("service call {signature} = {value}"),
            None => info!("service call {signature}"),
        }
        Ok(decoded.value)
    }

    /// Send a bare newline to discard any partially typed command.
    ///
    /// Useful once, right after a shell channel is opened.
    pub fn send_newline(&mut self) -> Result<()> {
        self.write_all(b"\n")
    }

    /// Borrow the underlying channel.
    pub fn get_ref(&self) -> &C {
        &self.channel
    }

    /// Mutably borrow the underlying channel.
    pub fn get_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Consume the caller and return the channel.
    pub fn into_inner(self) -> C {
        self.channel
    }

    /// Current dispatch configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    fn write_all(&mut self, mut buf: &[u8]) -> Result<()> {
        while !buf.is_empty() {
            match self.channel.write(buf) {
                Ok(0) => return Err(DispatchError::ChannelClosed),
                Ok(n) => buf = &buf[n..],
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(DispatchError::Io(err)),
            }
        }
        loop {
            match self.channel.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(DispatchError::Io(err)),
            }
        }
    }

    fn read_reply(&mut self) -> Result<String> {
        let mut buf = vec![0u8; self.config.max_reply_size];
        let read = loop {
            match self.channel.read(&mut buf) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(DispatchError::Io(err)),
            }
        };
        if read == 0 {
            return Err(DispatchError::ChannelClosed);
        }
        Ok(String::from_utf8_lossy(&buf[..read]).into_owned())
    }
}

/// Invoke `method` on `service` over a borrowed channel with default configuration.
pub fn call<C: Read + Write>(
    channel: &mut C,
    service: &ServiceInterface,
    method: &str,
    arguments: &[ParcelValue],
) -> Result<Option<ParcelValue>> {
    ServiceCaller::new(channel).call(service, method, arguments)
}

/// Render a call for traces and errors, e.g. `setFlag(true, 3)`.
pub fn format_call(method: &str, arguments: &[ParcelValue]) -> String {
    let arguments = arguments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{method}({arguments})")
}
