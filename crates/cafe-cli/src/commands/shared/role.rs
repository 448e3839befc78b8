use cafe_core::enums::Role;

/// Reject knowledge-base edits unless the CLI runs as an expert.
pub fn require_expert(role: Role, action: &str) -> anyhow::Result<()> {
    if role.can_edit() {
        return Ok(());
    }
    anyhow::bail!("'{action}' edits the knowledge base and requires the expert role (running as {role}); pass --role expert")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expert_may_edit() {
        assert!(require_expert(Role::Expert, "coffee-type create").is_ok());
    }

    #[test]
    fn specialist_is_rejected_with_hint() {
        let err = require_expert(Role::Specialist, "coffee-type create").expect_err("should fail");
        let message = err.to_string();
        assert!(message.contains("coffee-type create"));
        assert!(message.contains("--role expert"));
    }
}
