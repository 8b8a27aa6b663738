use culler_codec::{Codec, DecodeError};

/// Agent-to-monitor telemetry.
#[derive(Clone, Debug, PartialEq)]
pub enum Telemetry {
    /// One entry per captured frame, rejected or not.
    Frame {
        seq: u64,
        class_id: u32,
        probability: f32,
        rejected: bool,
    },
    /// Published after every applied command and on shutdown.
    State { paused: bool, min_probability: f32 },
    /// A per-frame failure the loop logged and skipped.
    Fault { message: String },
}

impl Codec for Telemetry {
    fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Telemetry::Frame {
                seq,
                class_id,
                probability,
                rejected,
            } => {
                0u32.encode(buf);
                seq.encode(buf);
                class_id.encode(buf);
                probability.encode(buf);
                rejected.encode(buf);
            }
            Telemetry::State {
                paused,
                min_probability,
            } => {
                1u32.encode(buf);
                paused.encode(buf);
                min_probability.encode(buf);
            }
            Telemetry::Fault { message } => {
                2u32.encode(buf);
                message.encode(buf);
            }
        }
    }

    fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        match u32::decode(buf, pos)? {
            0 => Ok(Telemetry::Frame {
                seq: u64::decode(buf, pos)?,
                class_id: u32::decode(buf, pos)?,
                probability: f32::decode(buf, pos)?,
                rejected: bool::decode(buf, pos)?,
            }),
            1 => Ok(Telemetry::State {
                paused: bool::decode(buf, pos)?,
                min_probability: f32::decode(buf, pos)?,
            }),
            2 => Ok(Telemetry::Fault {
                message: String::decode(buf, pos)?,
            }),
            tag => Err(DecodeError::InvalidVariant(tag)),
        }
    }
}

/// Monitor-to-agent commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Pause,
    Resume,
    SetMinProbability(f32),
    QueryState,
}

impl Codec for Command {
    fn encode(&self, buf: &mut Vec<u8>) {
        match self {
            Command::Pause => 0u32.encode(buf),
            Command::Resume => 1u32.encode(buf),
            Command::SetMinProbability(p) => {
                2u32.encode(buf);
                p.encode(buf);
            }
            Command::QueryState => 3u32.encode(buf),
        }
    }

    fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        match u32::decode(buf, pos)? {
            0 => Ok(Command::Pause),
            1 => Ok(Command::Resume),
            2 => Ok(Command::SetMinProbability(f32::decode(buf, pos)?)),
            3 => Ok(Command::QueryState),
            tag => Err(DecodeError::InvalidVariant(tag)),
        }
    }
}
