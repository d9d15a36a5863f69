//! # Integration Test Flows
//!
//! Requests travel the whole stack: dispatcher → registry snapshot →
//! supertype traversal → cached decision manager → rights hierarchy →
//! component.
//!
//! ## Flows Tested:
//!
//! 1. **Descendant rights**: `CourseAdmin.Grades` satisfies a
//!    `CourseAdmin` requirement only in `WithDescendants` mode
//! 2. **Declaration precedence**: method-level over type-level, nearest type first
//! 3. **Ownership and identity**: owner-or-right disjunction, asserted identities
//! 4. **Resolution**: every miss is the same `NotFound`

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared_types::{ComponentId, DenyReason, SecurityContext};
    use std::sync::atomic::Ordering;
    use tg_02_decision::{AccessChecker, DeclarationKey, MatchMode, SecurityDeclaration};
    use tg_03_registry::Lifecycle;
    use tg_04_dispatch::{DispatchOutcome, RpcRequest};

    use crate::fixtures::{platform, snapshot};

    fn ta() -> SecurityContext {
        SecurityContext::user("ta").with_right("CourseAdmin.Grades")
    }

    // =========================================================================
    // DESCENDANT RIGHTS
    // =========================================================================

    #[tokio::test]
    async fn test_descendant_right_grants_with_descendants_mode() {
        let platform = platform();

        let outcome = platform
            .dispatcher
            .dispatch(RpcRequest::get("/grades/list/cs101"), &ta())
            .await;

        assert_eq!(
            outcome,
            DispatchOutcome::Ok {
                value: json!({"method": "list", "caller": "ta", "sub_path": "cs101"})
            }
        );
        assert_eq!(platform.recorder.calls(), vec!["list".to_string()]);
    }

    #[tokio::test]
    async fn test_descendant_right_denied_in_exact_mode() {
        let platform = platform();

        // `publish` requires CourseAdmin exactly
        let outcome = platform
            .dispatcher
            .dispatch(RpcRequest::post("/grades/publish"), &ta())
            .await;
        assert_eq!(
            outcome,
            DispatchOutcome::Forbidden {
                reason: DenyReason::InsufficientRights
            }
        );

        let admin = SecurityContext::user("prof").with_right("CourseAdmin");
        let outcome = platform
            .dispatcher
            .dispatch(RpcRequest::post("/grades/publish"), &admin)
            .await;
        assert!(outcome.is_ok());
        assert_eq!(platform.recorder.calls(), vec!["publish".to_string()]);
    }

    #[tokio::test]
    async fn test_anonymous_caller_gets_not_authenticated() {
        let platform = platform();
        let outcome = platform
            .dispatcher
            .dispatch(RpcRequest::get("/grades/list"), &SecurityContext::anonymous())
            .await;
        assert_eq!(outcome.reason_text(), Some("Not logged in or session expired"));
        assert_eq!(platform.recorder.count(), 0);
    }

    // =========================================================================
    // DECLARATION PRECEDENCE
    // =========================================================================

    #[tokio::test]
    async fn test_public_method_overrides_type_level_requirement() {
        let platform = platform();
        let outcome = platform
            .dispatcher
            .dispatch(RpcRequest::get("/grades/syllabus"), &SecurityContext::anonymous())
            .await;
        assert!(outcome.is_ok());
    }

    #[tokio::test]
    async fn test_interface_method_declaration_beats_superclass_type_declaration() {
        let platform = platform();
        let student = SecurityContext::user("stu");

        // summary: only Service's type-level "any authenticated user" applies
        let summary = platform
            .dispatcher
            .dispatch(RpcRequest::get("/dashboard/summary"), &student)
            .await;
        assert!(summary.is_ok());

        // export: Reporting#export requires Reports
        let export = platform
            .dispatcher
            .dispatch(RpcRequest::get("/dashboard/export"), &student)
            .await;
        assert_eq!(export.reason_text(), Some("Insufficient rights"));

        let analyst = SecurityContext::user("ana").with_right("Reports");
        let export = platform
            .dispatcher
            .dispatch(RpcRequest::get("/dashboard/export"), &analyst)
            .await;
        assert!(export.is_ok());
    }

    // =========================================================================
    // OWNERSHIP AND IDENTITY
    // =========================================================================

    #[tokio::test]
    async fn test_owner_or_roster_right_may_update_profile() {
        let platform = platform();
        let update = || RpcRequest::post("/profile/update").with_params(json!({"bio": "hi"}));

        let owner = SecurityContext::user("sam").with_resource_owner("sam");
        assert!(platform.dispatcher.dispatch(update(), &owner).await.is_ok());

        let registrar = SecurityContext::user("reg")
            .with_right("CourseAdmin.Roster")
            .with_resource_owner("sam");
        assert!(platform.dispatcher.dispatch(update(), &registrar).await.is_ok());

        let stranger = SecurityContext::user("eve").with_resource_owner("sam");
        assert_eq!(
            platform.dispatcher.dispatch(update(), &stranger).await,
            DispatchOutcome::Forbidden {
                reason: DenyReason::InsufficientRights
            }
        );

        // Per-request lifecycle: one fresh instance per granted call only
        assert_eq!(platform.profiles_created.load(Ordering::SeqCst), 2);
        let profile = platform.registry.resolve(&ComponentId::new("profile")).unwrap();
        assert_eq!(profile.lifecycle(), Lifecycle::PerRequest);
    }

    #[tokio::test]
    async fn test_asserted_identity_mismatch() {
        let platform = platform();
        let ctx = ta().with_asserted_identity("someone-else");
        let outcome = platform
            .dispatcher
            .dispatch(RpcRequest::get("/grades/list"), &ctx)
            .await;
        assert_eq!(outcome.reason_text(), Some("Logged in as a different user"));
        assert_eq!(platform.recorder.count(), 0);
    }

    // =========================================================================
    // RESOLUTION
    // =========================================================================

    #[tokio::test]
    async fn test_resolution_failures_are_indistinguishable() {
        let platform = platform();
        let admin = SecurityContext::user("root").with_rights(["CourseAdmin", "Reports"]);

        let misses = [
            RpcRequest::get("/grades"),
            RpcRequest::get("/nope/list"),
            RpcRequest::get("/grades/nope"),
            RpcRequest::get("/grades/publish"),
            RpcRequest::post("/health/ping"),
        ];
        for request in misses {
            let outcome = platform.dispatcher.dispatch(request, &admin).await;
            assert_eq!(outcome, DispatchOutcome::NotFound);
            assert_eq!(serde_json::to_value(&outcome).unwrap(), json!({"outcome": "not_found"}));
        }

        let metrics = platform.dispatcher.metrics().snapshot();
        assert_eq!(metrics.not_found, 5);
        assert_eq!(metrics.invocations, 0);
    }

    // =========================================================================
    // REUSABLE PRIMITIVES
    // =========================================================================

    #[test]
    fn test_access_checker_shares_snapshot_rights() {
        let platform = platform();
        let snapshot = platform.registry.snapshot();
        let checker = AccessChecker::new(snapshot.rights().clone());

        let key = DeclarationKey::for_method("CsvExport", "download");
        let declaration = SecurityDeclaration::new()
            .requiring("CourseAdmin")
            .with_match_mode(MatchMode::WithDescendants);

        assert!(checker.check_declaration(&key, &declaration, &ta()).unwrap().is_granted());
        assert!(checker
            .check_declaration(&key, &declaration, &SecurityContext::user("stu"))
            .unwrap()
            .is_denied());
    }

    #[test]
    fn test_snapshot_compiles_all_declarations_eagerly() {
        let platform = platform();
        let current = platform.registry.snapshot();
        let stats = current.decisions().stats();

        // Service, Reporting#export, GradeBook, GradeBook#publish,
        // GradeBook#syllabus, Profile#update, Health
        assert_eq!(stats.entries, 7);
        assert_eq!(stats.builds, 7);

        let again = snapshot(
            MatchMode::Exact,
            &platform.recorder,
            &platform.profiles_created,
        );
        assert_eq!(again.decisions().len(), 7);
    }
}
