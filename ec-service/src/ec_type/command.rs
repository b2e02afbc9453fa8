//! EC host command codec
use core::future::Future;

use heapless::Vec;

/// Size of the host command parameter buffer, shared by requests and responses
pub const EC_HOST_PARAM_SIZE: usize = 0xfc;

/// Host command IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum CommandId {
    /// Get or set device event masks
    DeviceEvent = 0x0067,
    /// Get the number of peripheral charge ports
    PchgCount = 0x0134,
    /// Get the status of a peripheral charge port
    Pchg = 0x0135,
}

impl From<CommandId> for u16 {
    fn from(id: CommandId) -> Self {
        id as u16
    }
}

/// Error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The request or response does not fit in the host command buffer
    Allocation,
    /// The transport reported a failure, contains the negative status
    Transport(i32),
    /// The response was shorter than the expected record
    InvalidResponse,
}

/// A host command in flight
///
/// `data` holds the request on the way out and the response on the way back, so it is sized to the larger of
/// the two.
#[derive(Debug, Clone)]
pub struct HostCommand {
    /// Command version
    pub version: u8,
    /// Command code, including any sub-device offset
    pub command: u16,
    /// Number of request bytes in `data`
    pub outsize: usize,
    /// Number of response bytes expected in `data`
    pub insize: usize,
    /// Request/response payload
    pub data: Vec<u8, EC_HOST_PARAM_SIZE>,
}

impl HostCommand {
    /// Build a command carrying `request` and expecting up to `insize` response bytes
    pub fn new(version: u8, command: u16, request: &[u8], insize: usize) -> Result<Self, Error> {
        let outsize = request.len();
        let mut data = Vec::new();
        data.resize_default(outsize.max(insize))
            .map_err(|_| Error::Allocation)?;
        data[..outsize].copy_from_slice(request);

        Ok(Self {
            version,
            command,
            outsize,
            insize,
            data,
        })
    }

    /// Request payload
    pub fn request(&self) -> &[u8] {
        &self.data[..self.outsize]
    }

    /// Response payload buffer
    pub fn response_mut(&mut self) -> &mut [u8] {
        &mut self.data[..self.insize]
    }
}

/// EC command channel
pub trait Transport {
    /// Send `msg.request()` and fill `msg.response_mut()`
    ///
    /// Returns the number of response bytes written, or the negative transport status on failure.
    fn xfer(&mut self, msg: &mut HostCommand) -> impl Future<Output = Result<usize, i32>>;
}

/// A fixed-layout request record
pub trait HostRequest {
    /// Command this record is sent with
    const COMMAND: CommandId;
    /// Command version
    const VERSION: u8;
    /// Encoded size in bytes
    const SIZE: usize;
    /// Record returned by the EC
    type Response: HostResponse;

    /// Write the record into `buf`, which is exactly `SIZE` bytes long
    fn encode(&self, buf: &mut [u8]);
}

/// A fixed-layout response record
pub trait HostResponse: Sized {
    /// Encoded size in bytes
    const SIZE: usize;

    /// Read the record from `buf`, which is exactly `SIZE` bytes long
    fn decode(buf: &[u8]) -> Self;
}

/// Send a raw host command
///
/// `cmd_offset` is added to `command` to address multiplexed sub-devices. Returns the number of response bytes
/// copied into `response`.
pub async fn execute_raw<T: Transport>(
    transport: &mut T,
    cmd_offset: u16,
    version: u8,
    command: u16,
    request: &[u8],
    response: &mut [u8],
) -> Result<usize, Error> {
    let mut msg = HostCommand::new(version, cmd_offset.wrapping_add(command), request, response.len())?;

    let received = transport.xfer(&mut msg).await.map_err(Error::Transport)?;
    let received = received.min(response.len());
    response[..received].copy_from_slice(&msg.data[..received]);
    Ok(received)
}

/// Send a typed request and decode its response
pub async fn execute<T: Transport, R: HostRequest>(
    transport: &mut T,
    cmd_offset: u16,
    request: &R,
) -> Result<R::Response, Error> {
    let mut out = [0u8; EC_HOST_PARAM_SIZE];
    let mut rsp = [0u8; EC_HOST_PARAM_SIZE];
    if R::SIZE > out.len() || R::Response::SIZE > rsp.len() {
        return Err(Error::Allocation);
    }

    request.encode(&mut out[..R::SIZE]);
    let received = execute_raw(
        transport,
        cmd_offset,
        R::VERSION,
        R::COMMAND.into(),
        &out[..R::SIZE],
        &mut rsp[..R::Response::SIZE],
    )
    .await?;

    if received < R::Response::SIZE {
        return Err(Error::InvalidResponse);
    }

    Ok(R::Response::decode(&rsp[..R::Response::SIZE]))
}
