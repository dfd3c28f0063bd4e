//! Maps the error taxonomy in the crate spec onto process exit codes in
//! exactly one place: `main`. 0 = ok/no match, 1 = error, 2 = a policy
//! match with `--filter-fail` set (§7, §8 Testable Property 6).

pub const EXIT_OK: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_POLICY_MATCH: i32 = 2;

pub fn exit_code(result: &anyhow::Result<bool>) -> i32 {
    match result {
        Ok(true) => EXIT_POLICY_MATCH,
        Ok(false) => EXIT_OK,
        Err(_) => EXIT_ERROR,
    }
}
