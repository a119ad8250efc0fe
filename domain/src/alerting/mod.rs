//! Alert subscriptions and rule evaluation

pub mod rules;
pub mod subscription;

pub use rules::{AlertSeverity, ConditionsSnapshot, TriggeredAlert, evaluate};
pub use subscription::{
    AlertSubscription, AlertType, NotificationPreferences, SubscriptionConfig, Thresholds,
};
