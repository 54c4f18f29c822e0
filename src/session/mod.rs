pub(crate) mod badge_session;
