//! Leaf widgets: buttons, check/radio boxes, text, and icons.

mod button;
mod checkbox;
mod icon;
mod label;
mod radio;
mod textbox;

pub use button::Button;
pub use checkbox::Checkbox;
pub use icon::Icon;
pub use label::Label;
pub use radio::Radiobutton;
pub use textbox::TextBox;
