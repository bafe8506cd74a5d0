use {
    byteorder::{ByteOrder, LittleEndian},
    derive_more::Display,
    hex::FromHex,
    num_bigint::BigUint,
    num_rational::BigRational,
    rand::RngCore,
    serde::{
        Deserialize, Serialize, Serializer,
        de::{self, Deserializer},
        ser::SerializeSeq,
    },
    serde_json::Value,
    serde_with::{DeserializeFromStr, SerializeDisplay},
    snafu::Snafu,
    std::{
        fmt::{self, Display, Formatter},
        str::FromStr,
    },
    uuid::Uuid,
};

pub use {
    blockhash::BlockHash,
    difficulty::{DifficultyInfo, compact_to_target},
    error::{JsonRpcError, StratumError},
    extranonce::Extranonce,
    hexutil::{
        CURRENT_WORK_GEN_TX1_OFFSET, CURRENT_WORK_GEN_TX2_OFFSET, CURRENT_WORK_HEIGHT_OFFSET,
        CURRENT_WORK_NBITS_OFFSET, CURRENT_WORK_NTIME_OFFSET, CURRENT_WORK_PREVBLOCK_OFFSET,
        CURRENT_WORK_VERSION_OFFSET, HexUtilError, SPLICE_EXTRANONCE1_OFFSET,
        SPLICE_EXTRANONCE2_OFFSET, SPLICE_NONCE_OFFSET, hex_reversed, reverse_prev_block_words,
    },
    job::{CurrentWork, Job, JobId},
    message::{Id, Message, identify_message},
    notify::Notify,
    set_difficulty::SetDifficulty,
    share::{Account, AcceptedWork, Share},
    username::{AccountId, ActiveNet, AddressError, ParsedUsername, Username},
    vendor::MinerVariant,
};

#[cfg(feature = "server")]
pub use client::{
    ClientConfig, ClientHandle, ClientToken, Handles, RateLimitClass, StoreError, run,
};

mod authorize;
mod blockhash;
mod difficulty;
mod error;
mod extranonce;
mod hexutil;
mod job;
mod message;
mod notify;
mod set_difficulty;
mod share;
mod submit;
mod subscribe;
mod username;
mod vendor;

#[cfg(feature = "server")]
mod client;

pub use {authorize::Authorize, submit::Submit, subscribe::Subscribe, subscribe::SubscribeResult};

/// Maximum length, in bytes, of one inbound protocol line before the connection is dropped.
pub const MAX_LINE_LEN: usize = 250;
