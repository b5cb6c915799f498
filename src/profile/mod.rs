//! Profiles, the personal or business identities that own all financial data,
//! and the session that selects the active profile.

mod db;
mod domain;
mod seed;
mod session;
mod sign_in;

pub use db::{
    ProfileUpdate, create_profile, create_profile_table, delete_profiles_by_type,
    find_first_profile_by_type, get_all_profiles, get_profile, upsert_profile,
};
pub use domain::{Profile, ProfileId, ProfileType};
pub use seed::{DEFAULT_CURRENCY, SeedOutcome, seed_default_profiles, upsert_default_profiles};
pub use session::{Session, get_current_profile_id};
pub(crate) use db::map_profile_row;
pub(crate) use session::{ProfileGuardState, profile_guard, profile_guard_hx};
pub(crate) use sign_in::{get_sign_in_page, get_sign_out, sign_in_endpoint};

#[cfg(test)]
pub(crate) use session::set_profile_cookie;
