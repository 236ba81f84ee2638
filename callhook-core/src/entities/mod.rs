pub mod call_events;
