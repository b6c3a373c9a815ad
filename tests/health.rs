mod common;

use common::*;

#[tokio::test]
async fn health_returns_ok() {
    let ctx = TestContext::new();
    let (status, body) = get_raw(&ctx.app, "/api/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, "ok");
}
