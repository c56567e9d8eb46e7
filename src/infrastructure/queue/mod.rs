mod channel_queue;

pub use channel_queue::{ChannelAudioQueue, ChannelSubscriber, DeadLetter, DeadLetterSink};
