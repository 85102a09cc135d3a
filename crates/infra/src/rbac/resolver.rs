use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use dashgate_auth::{Action, Permission, PermissionSet, Role, RoleBinding, Scope, SubjectKind};

use crate::rbac::PermissionSnapshot;
use crate::store::{Query, SharedStore, StoreError};

/// Failure to rebuild the permission snapshot.
///
/// Deliberately not convertible into a service error: a refresh failure never
/// fails the mutation that triggered it.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("unable to list role bindings: {0}")]
    ListBindings(#[source] StoreError),

    #[error("unable to load role '{role}' referenced from project '{project}': {source}")]
    LoadRole {
        project: String,
        role: String,
        #[source]
        source: StoreError,
    },
}

/// Freshness of the published snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CacheState {
    /// The snapshot reflects the last successful rebuild.
    Fresh,
    /// The last rebuild failed; the previous snapshot is still served.
    Stale,
}

/// Owner of the permission resolution cache.
///
/// `resolve` reads the current snapshot without locking and never waits on a
/// refresh in progress. `refresh` recomputes everything from the store and
/// swaps the snapshot only on full success, so readers see either the old or
/// the new grant set, never a mix. Refreshes are serialized among themselves,
/// so a rebuild that read the store earlier can never be published after one
/// that read it later.
pub struct PermissionResolver {
    roles: SharedStore<Role>,
    bindings: SharedStore<RoleBinding>,
    snapshot: ArcSwap<PermissionSnapshot>,
    /// Held by refreshers for the whole build + publish. Readers never take it.
    rebuild: Mutex<()>,
    generation: AtomicU64,
    stale: AtomicBool,
}

impl core::fmt::Debug for PermissionResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PermissionResolver")
            .field("generation", &self.snapshot.load().generation())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl PermissionResolver {
    /// Starts with an empty snapshot; call [`Self::refresh`] to populate it.
    pub fn new(roles: SharedStore<Role>, bindings: SharedStore<RoleBinding>) -> Self {
        Self {
            roles,
            bindings,
            snapshot: ArcSwap::from_pointee(PermissionSnapshot::default()),
            rebuild: Mutex::new(()),
            generation: AtomicU64::new(0),
            stale: AtomicBool::new(false),
        }
    }

    /// Resolved permissions of `login` (empty for unknown principals).
    pub fn resolve(&self, login: &str) -> PermissionSet {
        self.snapshot
            .load()
            .permissions(login)
            .cloned()
            .unwrap_or_default()
    }

    pub fn has_permission(&self, login: &str, project: &str, action: Action, kind: &str) -> bool {
        self.snapshot
            .load()
            .permissions(login)
            .is_some_and(|set| set.allows(project, action, kind))
    }

    /// Current snapshot handle.
    pub fn snapshot(&self) -> Arc<PermissionSnapshot> {
        self.snapshot.load_full()
    }

    pub fn state(&self) -> CacheState {
        if self.stale.load(Ordering::Acquire) {
            CacheState::Stale
        } else {
            CacheState::Fresh
        }
    }

    /// Rebuild the snapshot from the store.
    pub fn refresh(&self) -> Result<(), RefreshError> {
        // The guard protects no data, so a poisoned lock is still usable.
        let _rebuild = self.rebuild.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let users = match self.build() {
            Ok(users) => users,
            Err(err) => {
                self.stale.store(true, Ordering::Release);
                return Err(err);
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let principals = users.len();
        self.snapshot
            .store(Arc::new(PermissionSnapshot::new(users, generation, Utc::now())));
        self.stale.store(false, Ordering::Release);

        info!(generation, principals, "RBAC cache refreshed");
        Ok(())
    }

    fn build(&self) -> Result<HashMap<String, PermissionSet>, RefreshError> {
        let bindings = self
            .bindings
            .list(&Query::all())
            .map_err(RefreshError::ListBindings)?;

        // Roles are shared by many bindings; load each one once per rebuild.
        let mut roles: HashMap<(String, String), Option<Vec<Permission>>> = HashMap::new();
        let mut users: HashMap<String, PermissionSet> = HashMap::new();

        for binding in &bindings {
            let project = binding.metadata.project.clone();
            let role_name = binding.spec.role.clone();

            let permissions = match roles.entry((project.clone(), role_name.clone())) {
                Entry::Occupied(slot) => slot.into_mut(),
                Entry::Vacant(slot) => {
                    let loaded = match self.roles.get(&project, &role_name) {
                        Ok(role) => Some(role.spec.permissions),
                        Err(err) if err.is_not_found() => {
                            warn!(
                                project = %project,
                                binding = %binding.metadata.name,
                                role = %role_name,
                                "role binding references a missing role; skipping"
                            );
                            None
                        }
                        Err(source) => {
                            return Err(RefreshError::LoadRole {
                                project,
                                role: role_name,
                                source,
                            });
                        }
                    };
                    slot.insert(loaded)
                }
            };

            let Some(permissions) = permissions else {
                continue;
            };

            let scope = Scope::of_project(&binding.metadata.project);
            for subject in &binding.spec.subjects {
                match subject.kind {
                    SubjectKind::User => users
                        .entry(subject.name.clone())
                        .or_default()
                        .grant_all(&scope, permissions.iter()),
                }
            }
        }

        debug!(bindings = bindings.len(), "resolved role bindings");
        Ok(users)
    }
}
