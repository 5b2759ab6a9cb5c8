//! Client-side form logic: the voter form submit pipeline, the optimistic
//! list it updates and the id-card QR decoder.

pub mod actions;
pub mod optimistic;
pub mod qr;
pub mod voter_form;
