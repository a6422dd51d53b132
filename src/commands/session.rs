use super::SiteState;
use crate::error::Result;
use crate::gate::PageAccess;
use crate::membership::MembershipRecord;
use crate::profile::{HeaderGreeting, MemberProfile};

/// Raw membership record, or `None` when nobody has joined yet.
#[tauri::command]
pub async fn load_session(state: tauri::State<'_, SiteState>) -> Result<Option<MembershipRecord>> {
    state.ctx.session().read()
}

/// Called by every page on mount. Protected pages without a session get a
/// redirect instead of the record.
#[tauri::command]
pub async fn guard_route(path: String, state: tauri::State<'_, SiteState>) -> Result<PageAccess> {
    state.ctx.open_page(&path)
}

#[tauri::command]
pub async fn logout(state: tauri::State<'_, SiteState>) -> Result<()> {
    state.ctx.logout()
}

#[tauri::command]
pub async fn member_profile(state: tauri::State<'_, SiteState>) -> Result<Option<MemberProfile>> {
    state.ctx.profile()
}

#[tauri::command]
pub async fn header_greeting(state: tauri::State<'_, SiteState>) -> Result<HeaderGreeting> {
    Ok(state.ctx.greeting())
}
