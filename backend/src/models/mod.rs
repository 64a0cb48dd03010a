pub mod connection;
pub mod favorite;
pub mod interaction;
pub mod notification;
pub mod partner;
pub mod profile;
pub mod user;

pub use connection::{ConnectionRequest, ConnectionStatus};
pub use favorite::{Favorite, FavoriteCategory};
pub use interaction::{InteractionKind, UserInteraction};
pub use notification::{NotificationLog, NotificationStatus, PushSubscription};
pub use partner::{ContactVisibility, PartnerCard, PartnerKind};
pub use profile::{
    CONTACT_PLATFORMS, ContactLink, PracticePurpose, ProfileUpdate, ProfileWithName, SkillLevel,
    SpeakingProfile,
};
pub use user::User;
