//! BSC consensus validation logic ported from reth-bsc-trail
//! 
//! This module contains the pre-execution and post-execution validation
//! logic that was missing from our initial implementation.

use super::snapshot::Snapshot;
use super::vote::{VoteAddress, MAX_ATTESTATION_EXTRA_LENGTH};
use super::Parlia;
use crate::hardforks::BscHardforks;
use alloy_primitives::{Address, B256, U256};
use alloy_consensus::BlockHeader;
use blst::{
    min_pk::{PublicKey, Signature},
    BLST_ERROR,
};
use bit_set::BitSet;
use reth::consensus::ConsensusError;
use reth_chainspec::EthChainSpec;
use reth_primitives_traits::SealedHeader;
use std::collections::HashMap;
use std::sync::Arc;
use crate::consensus::parlia::util::calculate_millisecond_timestamp;

const BLST_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// BSC consensus validator that implements the missing pre/post execution logic
#[derive(Debug, Clone)]
pub struct BscConsensusValidator<ChainSpec> {
    chain_spec: Arc<ChainSpec>,
}

impl<ChainSpec> BscConsensusValidator<ChainSpec>
where
    ChainSpec: EthChainSpec + BscHardforks,
{
    /// Create a new BSC consensus validator
    pub fn new(chain_spec: Arc<ChainSpec>) -> Self {
        Self { chain_spec }
    }

    /// Verify cascading fields before block execution
    /// This is the main pre-execution validation entry point
    ///
    /// `pre_snap` is the snapshot at `parent.number() - 1`, used to resolve
    /// the BLS public keys of a vote attestation's signers — the attestation
    /// references the validator set one block *before* `parent`, since
    /// `parent`'s own snapshot may already reflect an epoch rotation that
    /// post-dates the votes it carries.
    pub fn verify_cascading_fields(
        &self,
        header: &SealedHeader,
        parent: &SealedHeader,
        ancestor: Option<&HashMap<B256, SealedHeader>>,
        snap: &Snapshot,
        pre_snap: &Snapshot,
    ) -> Result<(), ConsensusError> {
        self.verify_block_time_for_ramanujan(snap, header, parent)?;
        self.verify_vote_attestation(pre_snap, header, parent, ancestor)?;
        self.verify_seal(snap, header)?;
        Ok(())
    }

    /// Verify block time for Ramanujan fork
    /// After Ramanujan activation, blocks must respect `parent.time + period + back_off(signer)`.
    fn verify_block_time_for_ramanujan(
        &self,
        snapshot: &Snapshot,
        header: &SealedHeader,
        parent: &SealedHeader,
    ) -> Result<(), ConsensusError> {
        if self.chain_spec.is_ramanujan_active_at_block(header.number()) {
            let block_interval = snapshot.block_interval * 1000;
            let back_off_time = self.calculate_back_off_time(snapshot, header) * 1000;

            if calculate_millisecond_timestamp(header) < calculate_millisecond_timestamp(parent) + block_interval + back_off_time {
                return Err(ConsensusError::Other(format!(
                    "Block time validation failed for Ramanujan fork: block {} timestamp {} too early, parent_timestamp {}, block_interval {}, backoff_time {}",
                    header.number(),
                    calculate_millisecond_timestamp(header),
                    calculate_millisecond_timestamp(parent),
                    block_interval,
                    back_off_time
                )));
            }
        }
        Ok(())
    }

    /// Calculate back-off time (seconds) based on validator turn status, recent-signer
    /// exclusions, and the deterministic shuffle seeded by the block/turn-length.
    fn calculate_back_off_time(&self, snapshot: &Snapshot, header: &SealedHeader) -> u64 {
        let validator = header.beneficiary();
        let is_bohr = self.chain_spec.is_bohr_active_at_timestamp(header.timestamp());
        super::scheduler::back_off_time(snapshot, header.number(), validator, is_bohr)
    }

    /// Verify a header's embedded vote attestation: target/source consistency
    /// against `parent` and the justified ancestor, signer-quorum (`2N/3`
    /// ceil), and the BLS aggregate signature itself.
    fn verify_vote_attestation(
        &self,
        pre_snap: &Snapshot,
        header: &SealedHeader,
        parent: &SealedHeader,
        ancestor: Option<&HashMap<B256, SealedHeader>>,
    ) -> Result<(), ConsensusError> {
        if !self.chain_spec.is_plato_active_at_block(header.number()) {
            return Ok(());
        }

        let parlia = Parlia::new(self.chain_spec.clone(), super::EPOCH);
        let attestation = parlia
            .get_vote_attestation_from_header(header.header())
            .map_err(|err| ConsensusError::Other(err.to_string()))?;

        let Some(attestation) = attestation else { return Ok(()) };

        if attestation.extra.len() > MAX_ATTESTATION_EXTRA_LENGTH {
            return Err(ConsensusError::Other(format!(
                "attestation extra-data too large: {} bytes",
                attestation.extra.len()
            )));
        }

        // the attestation target must be the direct parent.
        if attestation.data.target_number != parent.number() ||
            attestation.data.target_hash != parent.hash()
        {
            return Err(ConsensusError::Other(format!(
                "attestation target mismatch at block {}: expected ({}, {}), got ({}, {})",
                header.number(),
                parent.number(),
                parent.hash(),
                attestation.data.target_number,
                attestation.data.target_hash
            )));
        }

        // the attestation source must be the highest justified ancestor.
        let justified = if pre_snap.vote_data.target_hash == B256::ZERO {
            ancestor
                .and_then(|a| a.values().find(|h| h.number() == 0))
                .cloned()
                .ok_or_else(|| ConsensusError::Other("missing genesis ancestor for justification check".to_string()))?
        } else {
            ancestor
                .and_then(|a| a.get(&pre_snap.vote_data.target_hash))
                .cloned()
                .ok_or_else(|| ConsensusError::Other("missing justified ancestor for vote attestation".to_string()))?
        };

        if attestation.data.source_number != justified.number() ||
            attestation.data.source_hash != justified.hash()
        {
            return Err(ConsensusError::Other(format!(
                "attestation source mismatch at block {}: expected ({}, {}), got ({}, {})",
                header.number(),
                justified.number(),
                justified.hash(),
                attestation.data.source_number,
                attestation.data.source_hash
            )));
        }

        // resolve the BLS public key of every signer the vote bitset names.
        let validators_count = pre_snap.validators.len();
        let vote_bit_set: BitSet<usize> =
            BitSet::from_iter((0..64).filter(|&i| (attestation.vote_address_set >> i) & 1 != 0));
        if vote_bit_set.len() > validators_count {
            return Err(ConsensusError::Other(format!(
                "attestation names more signers ({}) than the snapshot has validators ({})",
                vote_bit_set.len(),
                validators_count
            )));
        }

        let mut vote_addrs: Vec<VoteAddress> = Vec::with_capacity(vote_bit_set.len());
        for (i, validator) in pre_snap.validators.iter().enumerate() {
            if !vote_bit_set.contains(i) {
                continue;
            }
            let info = pre_snap
                .validators_map
                .get(validator)
                .ok_or_else(|| ConsensusError::Other(format!("validator {validator} missing from snapshot")))?;
            vote_addrs.push(info.vote_addr);
        }

        let required = (validators_count * 2 + 2) / 3; // ceil(2N/3)
        if vote_addrs.len() < required {
            return Err(ConsensusError::Other(format!(
                "attestation quorum failure at block {}: {} of {} required",
                header.number(),
                vote_addrs.len(),
                required
            )));
        }

        let public_keys: Vec<PublicKey> = vote_addrs
            .iter()
            .map(|addr| PublicKey::from_bytes(addr.as_slice()))
            .collect::<Result<_, _>>()
            .map_err(|_| ConsensusError::Other("invalid BLS public key in vote attestation".to_string()))?;
        let public_key_refs: Vec<&PublicKey> = public_keys.iter().collect();

        let signature = Signature::from_bytes(&attestation.agg_signature[..])
            .map_err(|_| ConsensusError::Other("invalid BLS aggregate signature encoding".to_string()))?;

        match signature.fast_aggregate_verify(
            true,
            attestation.data.hash().as_slice(),
            BLST_DST,
            &public_key_refs,
        ) {
            BLST_ERROR::BLST_SUCCESS => Ok(()),
            _ => Err(ConsensusError::Other(format!(
                "attestation signature verification failed at block {}",
                header.number()
            ))),
        }
    }

    /// Verify ECDSA signature seal
    /// This checks that the header was signed by the expected validator
    fn verify_seal(&self, snapshot: &Snapshot, header: &SealedHeader) -> Result<(), ConsensusError> {
        let proposer = self.recover_proposer_from_seal(header)?;
        
        if proposer != header.beneficiary() {
            return Err(ConsensusError::Other(format!(
                "Wrong header signer: expected {}, got {}",
                header.beneficiary(),
                proposer
            )));
        }

        if !snapshot.validators.contains(&proposer) {
            return Err(ConsensusError::Other(format!(
                "Signer {} not authorized",
                proposer
            )));
        }

        if snapshot.sign_recently(proposer) {
            return Err(ConsensusError::Other(format!(
                "Signer {} over limit",
                proposer
            )));
        }

        // Check difficulty matches validator turn status
        let is_inturn = snapshot.is_inturn(proposer);
        let expected_difficulty = if is_inturn { 2u64 } else { 1u64 };

        if header.difficulty() != U256::from(expected_difficulty) {
            return Err(ConsensusError::Other(format!(
                "Invalid difficulty: expected {}, got {}, expected_validator={}, actual_validator={} at block {}, snapshot_block={}",
                expected_difficulty,
                header.difficulty(),
                snapshot.expected_proposer(),
                proposer,
                header.number(),
                snapshot.block_number
            )));
        }

        // Never fatal: only a warning + counter bump if this slot already
        // produced a different header.
        super::double_sign::observe(header.parent_hash(), proposer, header.hash());

        Ok(())
    }

    /// Recover proposer address from header seal (ECDSA signature recovery)
    /// Following bsc-erigon's approach exactly
    pub fn recover_proposer_from_seal(&self, header: &SealedHeader) -> Result<Address, ConsensusError> {
        use secp256k1::{ecdsa::{RecoverableSignature, RecoveryId}, Message, SECP256K1};
        // Extract seal from extra data (last 65 bytes) - matching bsc-erigon extraSeal
        let extra_data = &header.extra_data();
        if extra_data.len() < 65 {
            return Err(ConsensusError::Other("Invalid seal: extra data too short".into()));
        }
        
        let signature = &extra_data[extra_data.len() - 65..];
        // Parse signature: 64 bytes + 1 recovery byte
        if signature.len() != 65 {
            return Err(ConsensusError::Other(format!("Invalid signature length: expected 65, got {}", signature.len()).into()));
        }
        let sig_bytes = &signature[..64];
        let recovery_id = signature[64];
        let recovery_id = RecoveryId::from_i32(recovery_id as i32)
            .map_err(|_| ConsensusError::Other("Invalid recovery ID".into()))?;
            
        let recoverable_sig = RecoverableSignature::from_compact(sig_bytes, recovery_id)
            .map_err(|_| ConsensusError::Other("Invalid signature format".into()))?;
        
        let seal_hash = crate::consensus::parlia::hash_with_chain_id(header, self.chain_spec.chain().id());
        let message = Message::from_digest(seal_hash.0);
        // Recover public key and derive address (matching bsc-erigon's crypto.Keccak256)
        let public_key = SECP256K1.recover_ecdsa(&message, &recoverable_sig)
            .map_err(|_| ConsensusError::Other("Failed to recover public key".into()))?;
            
        // Convert to address: keccak256(pubkey[1:])[12:]
        use alloy_primitives::keccak256;
        let public_key_bytes = public_key.serialize_uncompressed();
        let hash = keccak256(&public_key_bytes[1..]); // Skip 0x04 prefix
        let address = Address::from_slice(&hash[12..]);
        
        Ok(address)
    }
    
}

/// Post-execution validation logic
impl<ChainSpec> BscConsensusValidator<ChainSpec>
where
    ChainSpec: EthChainSpec + BscHardforks,
{
    /// Verify validators at epoch boundaries
    /// This checks that the validator set in the header matches the expected set
    pub fn verify_validators(
        &self,
        current_validators: Option<(Vec<Address>, HashMap<Address, super::vote::VoteAddress>)>,
        header: &SealedHeader,
    ) -> Result<(), ConsensusError> {
        let number = header.number();
        
        // Only check at epoch boundaries
        if number % 200 != 0 {  // BSC epoch is 200 blocks
            return Ok(());
        }

        let (mut validators, vote_addrs_map) = current_validators
            .ok_or_else(|| ConsensusError::Other("Invalid current validators data".to_string()))?;
            
        validators.sort();
        
        // For post-Luban blocks, extract validator bytes from header and compare
        if self.chain_spec.is_luban_active_at_block(number) {
            let validator_bytes: Vec<u8> = validators
                .iter()
                .flat_map(|v| {
                    let mut bytes = v.to_vec();
                    if let Some(vote_addr) = vote_addrs_map.get(v) {
                        bytes.extend_from_slice(vote_addr.as_ref());
                    }
                    bytes
                })
                .collect();
                
            // Extract expected bytes from header extra data
            let expected = self.get_validator_bytes_from_header(header)?;
            
            if validator_bytes != expected {
                return Err(ConsensusError::Other(format!(
                    "Validator set mismatch at block {}",
                    number
                )));
            }
        }
        
        Ok(())
    }



    /// Extract validator bytes from header extra data
    fn get_validator_bytes_from_header(&self, header: &SealedHeader) -> Result<Vec<u8>, ConsensusError> {
        let extra_data = header.extra_data();
        const EXTRA_VANITY_LEN: usize = 32;
        const EXTRA_SEAL_LEN: usize = 65;
        
        if extra_data.len() <= EXTRA_VANITY_LEN + EXTRA_SEAL_LEN {
            return Ok(Vec::new());
        }
        
        let validator_bytes_len = extra_data.len() - EXTRA_VANITY_LEN - EXTRA_SEAL_LEN;
        let validator_bytes = extra_data[EXTRA_VANITY_LEN..EXTRA_VANITY_LEN + validator_bytes_len].to_vec();
        
        Ok(validator_bytes)
    }
} 