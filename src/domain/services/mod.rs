pub mod event_publisher;
