//! `GET /orgchart` — the org's active users shaped into a `reports_to`
//! forest.

use std::collections::{HashMap, HashSet};

use aerobase_core::{
  org::{Role, User},
  store::OpsStore,
};
use axum::{extract::State, response::Response};
use serde::Serialize;
use uuid::Uuid;

use crate::{AppState, auth::CurrentUser, envelope, error::ApiError};

/// One user in the chart, with everyone reporting to them nested under
/// `reports`.
#[derive(Debug, Serialize)]
pub struct OrgChartNode {
  pub user_id:      Uuid,
  pub display_name: String,
  pub role:         Role,
  pub reports:      Vec<OrgChartNode>,
}

/// `GET /orgchart`
pub async fn get_chart<S>(
  State(state): State<AppState<S>>,
  current: CurrentUser,
) -> Result<Response, ApiError>
where
  S: OpsStore + 'static,
{
  let users = state
    .store
    .list_users(current.org_id())
    .await
    .map_err(ApiError::from_store)?;
  Ok(envelope::ok(build_forest(&users)))
}

/// Shape users into a forest. Roots are users with no supervisor, or whose
/// supervisor is not in the set (deactivated, or bad data). Supervision
/// cycles are broken by promoting one member of the cycle to a root, so
/// every user appears exactly once.
pub fn build_forest(users: &[User]) -> Vec<OrgChartNode> {
  let active: Vec<&User> = users.iter().filter(|u| u.active).collect();
  let ids: HashSet<Uuid> = active.iter().map(|u| u.user_id).collect();

  let mut children: HashMap<Uuid, Vec<&User>> = HashMap::new();
  let mut roots: Vec<&User> = Vec::new();
  for user in &active {
    match user.reports_to.filter(|p| ids.contains(p)) {
      Some(parent) => children.entry(parent).or_default().push(user),
      None => roots.push(user),
    }
  }
  for list in children.values_mut() {
    list.sort_by(|a, b| a.display_name.cmp(&b.display_name));
  }
  roots.sort_by(|a, b| a.display_name.cmp(&b.display_name));

  let mut visited = HashSet::new();
  let mut forest: Vec<OrgChartNode> = roots
    .iter()
    .map(|root| build_node(root, &children, &mut visited))
    .collect();

  // Anyone still unvisited sits on a cycle; surface them as extra roots.
  let mut leftovers: Vec<&User> = active
    .iter()
    .filter(|u| !visited.contains(&u.user_id))
    .copied()
    .collect();
  leftovers.sort_by(|a, b| a.display_name.cmp(&b.display_name));
  for user in leftovers {
    if !visited.contains(&user.user_id) {
      forest.push(build_node(user, &children, &mut visited));
    }
  }

  forest
}

fn build_node(
  user: &User,
  children: &HashMap<Uuid, Vec<&User>>,
  visited: &mut HashSet<Uuid>,
) -> OrgChartNode {
  visited.insert(user.user_id);
  let reports = children
    .get(&user.user_id)
    .into_iter()
    .flatten()
    .filter(|c| !visited.contains(&c.user_id))
    .copied()
    .collect::<Vec<_>>()
    .into_iter()
    .map(|c| build_node(c, children, visited))
    .collect();
  OrgChartNode {
    user_id: user.user_id,
    display_name: user.display_name.clone(),
    role: user.role,
    reports,
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

  fn user(name: &str, role: Role, reports_to: Option<Uuid>) -> User {
    User {
      user_id: Uuid::new_v4(),
      org_id: Uuid::new_v4(),
      display_name: name.into(),
      email: format!("{}@example.com", name.to_lowercase()),
      role,
      reports_to,
      password_hash: "$argon2id$fake".into(),
      active: true,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn forest_nests_reports_under_supervisors() {
    let boss = user("Alex", Role::Admin, None);
    let manager = user("Morgan", Role::Manager, Some(boss.user_id));
    let pilot_b = user("Billie", Role::Pilot, Some(manager.user_id));
    let pilot_a = user("Avery", Role::Pilot, Some(manager.user_id));

    let forest = build_forest(&[boss, manager, pilot_b, pilot_a]);

    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].display_name, "Alex");
    assert_eq!(forest[0].reports.len(), 1);
    let morgan = &forest[0].reports[0];
    assert_eq!(morgan.display_name, "Morgan");
    // children sorted by display name
    assert_eq!(morgan.reports[0].display_name, "Avery");
    assert_eq!(morgan.reports[1].display_name, "Billie");
  }

  #[test]
  fn missing_supervisor_becomes_root() {
    let orphan = user("Orphan", Role::Pilot, Some(Uuid::new_v4()));
    let forest = build_forest(&[orphan]);
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].display_name, "Orphan");
  }

  #[test]
  fn inactive_users_are_excluded() {
    let boss = user("Alex", Role::Admin, None);
    let mut gone = user("Gone", Role::Pilot, Some(boss.user_id));
    gone.active = false;

    let forest = build_forest(&[boss, gone]);
    assert_eq!(forest.len(), 1);
    assert!(forest[0].reports.is_empty());
  }

  #[test]
  fn supervision_cycle_still_lists_everyone() {
    let mut a = user("Ash", Role::Manager, None);
    let mut b = user("Blair", Role::Manager, None);
    a.reports_to = Some(b.user_id);
    b.reports_to = Some(a.user_id);

    let forest = build_forest(&[a, b]);
    let mut count = 0;
    fn walk(nodes: &[OrgChartNode], count: &mut usize) {
      for n in nodes {
        *count += 1;
        walk(&n.reports, count);
      }
    }
    walk(&forest, &mut count);
    assert_eq!(count, 2);
  }
}
