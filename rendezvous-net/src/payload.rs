//! Wire messages of the crawler pull protocol
//!
//! Framing: one message-id byte followed by the borsh-encoded payload.

use crate::error::ProtocolError;
use borsh::{BorshDeserialize, BorshSerialize};
use rendezvous_model::{Hash, SessionRecord};

/// One stored session, as sent to a crawler.
#[derive(Clone, Debug, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct RecordPayload {
    pub public_key: Vec<u8>,
    pub ip: Vec<u8>,
    pub port: u16,
    pub ping: f64,
    pub start: f64,
    pub stop: f64,
}

impl RecordPayload {
    pub const MSG_ID: u8 = 1;
}

impl From<&SessionRecord> for RecordPayload {
    fn from(record: &SessionRecord) -> Self {
        Self {
            public_key: record.public_key().to_vec(),
            ip: record.ip().to_vec(),
            port: record.port(),
            ping: record.ping(),
            start: record.start(),
            stop: record.stop(),
        }
    }
}

/// Ask a node for one random record.
///
/// `mid` names the node the request is meant for; a node ignores requests
/// carrying another node's mid, so a captured request cannot be replayed
/// against a different node.
#[derive(Clone, Debug, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct PullRecordPayload {
    pub mid: Hash,
}

impl PullRecordPayload {
    pub const MSG_ID: u8 = 2;
}

#[derive(Clone, Debug, PartialEq)]
pub enum RendezvousMessage {
    Record(RecordPayload),
    PullRecord(PullRecordPayload),
}

impl RendezvousMessage {
    pub fn msg_id(&self) -> u8 {
        match self {
            Self::Record(_) => RecordPayload::MSG_ID,
            Self::PullRecord(_) => PullRecordPayload::MSG_ID,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let mut buf = vec![self.msg_id()];
        match self {
            Self::Record(payload) => payload.serialize(&mut buf)?,
            Self::PullRecord(payload) => payload.serialize(&mut buf)?,
        }
        Ok(buf)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (&id, body) = bytes.split_first().ok_or(ProtocolError::Empty)?;
        match id {
            RecordPayload::MSG_ID => Ok(Self::Record(borsh::from_slice(body)?)),
            PullRecordPayload::MSG_ID => Ok(Self::PullRecord(borsh::from_slice(body)?)),
            other => Err(ProtocolError::UnknownMessage(other)),
        }
    }
}
