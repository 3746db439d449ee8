pub mod modal_frame;
pub mod modal_stack;
