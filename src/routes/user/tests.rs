#[cfg(test)]
mod tests {
    use secrecy::Secret;
    use sqlx::PgPool;
    use uuid::Uuid;

    use crate::domain::EmailObject;
    use crate::routes::user::schemas::{AuthenticateRequest, CreateUserAccount, UserRole};
    use crate::routes::user::utils::{
        fetch_user_by_id, hard_delete_user_account, register_user, validate_user_credentials,
        validate_user_role,
    };
    use crate::schemas::Status;
    use crate::utils::tests::{get_dummy_user_account, get_test_pool};

    pub async fn setup_user(
        pool: &PgPool,
        username: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<Uuid, Box<dyn std::error::Error>> {
        let user_account = CreateUserAccount {
            username: username.to_string(),
            email: EmailObject::new(email.to_string()),
            password: Secret::new(password.to_string()),
            display_name: "Test Traveller".to_string(),
            role,
        };
        let user_id = register_user(pool, user_account).await?;
        Ok(user_id)
    }

    #[test]
    fn test_validate_user_role() {
        let mut customer = get_dummy_user_account(
            "traveller".to_string(),
            "traveller@example.com".to_string(),
            UserRole::Customer,
        );

        // A customer must not pass the admin gate.
        let validate_response = validate_user_role(&customer, &[UserRole::Admin]);
        assert_eq!(
            validate_response,
            Some("Insufficient privilege to perform this action".to_string())
        );

        // A customer may use customer routes.
        let validate_response = validate_user_role(&customer, &[UserRole::Customer]);
        assert_eq!(validate_response, None);

        // An admin passes the admin gate.
        customer.role = UserRole::Admin;
        let validate_response = validate_user_role(&customer, &[UserRole::Admin]);
        assert_eq!(validate_response, None);

        // Inactive accounts are rejected regardless of role.
        customer.is_active = Status::Inactive;
        let validate_response = validate_user_role(&customer, &[UserRole::Admin]);
        assert_eq!(
            validate_response,
            Some("User account is inactive. Please contact customer support".to_string())
        );

        // Deleted accounts are rejected regardless of role.
        customer.is_active = Status::Active;
        customer.is_deleted = true;
        let validate_response = validate_user_role(&customer, &[UserRole::Admin]);
        assert_eq!(
            validate_response,
            Some("User account is deleted. Please contact customer support".to_string())
        );
    }

    #[tokio::test]
    async fn test_register_and_authenticate_user() {
        let pool = get_test_pool().await;
        let email = "ledger.user1@example.com";
        let user_res = setup_user(&pool, "ledgeruser1", email, "s3cr3t@123", UserRole::Customer).await;
        assert!(user_res.is_ok());
        let user_id = user_res.unwrap();

        let fetched = fetch_user_by_id(&pool, user_id).await;
        assert!(fetched.is_ok());
        let fetched = fetched.unwrap();
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().role, UserRole::Customer);

        // Duplicate registration is rejected.
        let dup_res = setup_user(&pool, "ledgeruser1", email, "s3cr3t@123", UserRole::Customer).await;
        assert!(dup_res.is_err());

        let auth_res = validate_user_credentials(
            AuthenticateRequest {
                identifier: email.to_string(),
                password: Secret::new("s3cr3t@123".to_string()),
            },
            &pool,
        )
        .await;
        assert!(auth_res.is_ok());
        assert_eq!(auth_res.unwrap(), user_id);

        let auth_res = validate_user_credentials(
            AuthenticateRequest {
                identifier: email.to_string(),
                password: Secret::new("wrong-password".to_string()),
            },
            &pool,
        )
        .await;
        assert!(auth_res.is_err());

        let delete_res = hard_delete_user_account(&pool, email).await;
        assert!(delete_res.is_ok());
    }
}
