mod binding;
mod control_loop;
mod event_tracker;
