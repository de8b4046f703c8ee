//! Fixed page copy.

pub const HOME_STARTING_CONTENT: &str = "Welcome to Inkwell. Sign up to publish your own posts, \
or browse what other writers have shared below.";

pub const ABOUT_CONTENT: &str = "Inkwell is a small multi-author blog. Every post belongs \
to the account that wrote it, and only that account can change or remove it.";

pub const CONTACT_CONTENT: &str = "Questions or feedback? Reach the editors at \
editors@inkwell.example and we will get back to you.";
