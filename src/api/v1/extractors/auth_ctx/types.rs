/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 */
use uuid::Uuid;

use crate::repos::Account;

/// The account resolved by the auth gate for this request.
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub account_id: Uuid,
    pub account: Account,
}

impl AuthCtx {
    pub fn new(account: Account) -> Self {
        Self {
            account_id: account.id,
            account,
        }
    }
}
