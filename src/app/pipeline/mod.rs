/// Pipeline enriching each incoming analytics event with
/// the configured query parameters of its current url
pub mod events;
