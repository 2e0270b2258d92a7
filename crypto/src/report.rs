//! Report digests, report signatures and content-addressed report ids.
//!
//! Both hashes are domain-separated and length-prefix the variable-length
//! target address, so no two distinct field tuples share an encoding.

use crate::hash::blake2b_256_multi;
use crate::sign::{sign_message, verify_signature};
use dagshield_types::{PrivateKey, PublicKey, ReportId, ReportSubmission, Signature, Timestamp};

const REPORT_DIGEST_DOMAIN: &[u8] = b"dagshield/report-signature/v1";
const REPORT_ID_DOMAIN: &[u8] = b"dagshield/report-id/v1";

/// Digest a reporter signs: (chainId, targetAddress, threatLevel, threatType, evidenceHash).
pub fn report_digest(submission: &ReportSubmission) -> [u8; 32] {
    let target = submission.target.as_bytes();
    let target_len = (target.len() as u32).to_be_bytes();
    blake2b_256_multi(&[
        REPORT_DIGEST_DOMAIN,
        &submission.chain_id.to_be_bytes(),
        &target_len,
        target,
        &[submission.threat_level],
        &[submission.threat_type.code()],
        submission.evidence_hash.as_bytes(),
    ])
}

/// Sign a submission as its reporter.
pub fn sign_report(submission: &ReportSubmission, private_key: &PrivateKey) -> Signature {
    sign_message(&report_digest(submission), private_key)
}

/// Check that `signature` was produced over `submission` by `public_key`.
pub fn verify_report(
    submission: &ReportSubmission,
    signature: &Signature,
    public_key: &PublicKey,
) -> bool {
    verify_signature(&report_digest(submission), signature, public_key)
}

/// Deterministic report id from (sourceChain, targetAddress, threatType, evidenceHash, submissionTime).
///
/// Severity and confidence are deliberately excluded: the same observation
/// resubmitted with a different score at the same instant is a duplicate.
pub fn derive_report_id(submission: &ReportSubmission, submitted_at: Timestamp) -> ReportId {
    let target = submission.target.as_bytes();
    let target_len = (target.len() as u32).to_be_bytes();
    ReportId::new(blake2b_256_multi(&[
        REPORT_ID_DOMAIN,
        &submission.chain_id.to_be_bytes(),
        &target_len,
        target,
        &[submission.threat_type.code()],
        submission.evidence_hash.as_bytes(),
        &submitted_at.to_be_bytes(),
    ]))
}
