pub mod completion;
pub mod connect;
pub mod matching;
pub mod notifier;
pub mod onesignal;

pub use connect::{ConnectOutcome, SendRequestError};
pub use notifier::NotificationOutcome;
pub use onesignal::{OneSignalService, PushResult, PushSender};
