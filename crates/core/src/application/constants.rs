// Probe constants (No magic values)

/// Echoes sent when ProbeOptions::packets_to_send is unset.
/// Unix pings run forever without a count, so every platform gets one.
pub const DEFAULT_PACKETS_TO_SEND: u32 = 1;

/// Size of each stdout read before line reassembly (bytes)
pub const READ_CHUNK_SIZE: usize = 4096;

/// Windows and BSD pings take per-echo timeouts in milliseconds
pub const MILLIS_PER_SECOND: u32 = 1000;
