//! # Ledger Exploits
//!
//! Attacks on the SMT-committed history: the witness proposes values, the
//! old root must open them.

#[cfg(test)]
mod tests {
    use crate::fixtures::{BookFixture, SaleSpec, WithdrawalSpec};
    use sb_account_book::domain::LedgerKey;
    use sb_account_book::{validate, AccountBookError, ErrorKind};
    use sb_types::{AccountBookData, Record, WitnessArgs};

    const SPORE: [u8; 32] = [0x5D; 32];

    #[test]
    fn test_double_sale_rejected() {
        let book = BookFixture::standard().at_state(500, 1000, 5);
        let first = book.sale(&SaleSpec::new(&book, SPORE));
        validate(&first.tx, &book.config).unwrap();

        let book = first.next;
        let replay = book.sale(&SaleSpec::new(&book, SPORE));
        let err = validate(&replay.tx, &book.config).unwrap_err();
        assert!(matches!(
            err,
            AccountBookError::LedgerProof {
                stage: "selling input",
                ..
            }
        ));
    }

    #[test]
    fn test_understated_history_rejected() {
        // Author took 120 already and pretends to have taken nothing.
        let book = BookFixture::standard()
            .at_state(600, 1100, 6)
            .with_entry(LedgerKey::Author, 120);
        let plan = WithdrawalSpec {
            claimed_withdrawn: Some(0),
            ..WithdrawalSpec::author(120, 120)
        };
        let err = validate(&book.withdrawal(&plan).tx, &book.config).unwrap_err();
        assert!(matches!(
            err,
            AccountBookError::LedgerProof {
                stage: "withdrawal input",
                ..
            }
        ));
    }

    #[test]
    fn test_inflated_income_rejected() {
        let book = BookFixture::standard().at_state(600, 1100, 6);
        let mut forged = book.clone();
        forged.income = 1000;

        // 1000 * 20% = 200 looks owed, but the root says 600.
        let step = forged.withdrawal(&WithdrawalSpec::author(200, 200));
        let err = validate(&step.tx, &book.config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LedgerProofViolation);
    }

    #[test]
    fn test_garbage_proof_rejected() {
        let book = BookFixture::standard().at_state(500, 1000, 5);
        let witness = AccountBookData {
            proof: vec![0xFF; 7],
            total_income_udt: 500,
            withdrawn_udt: None,
        };
        let tx = book
            .sale(&SaleSpec::new(&book, SPORE))
            .tx
            .with_witness(0, &WitnessArgs::with_output_type(witness.encode()));

        let err = validate(&tx, &book.config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LedgerProofViolation);
    }

    #[test]
    fn test_missing_book_witness_rejected() {
        let book = BookFixture::standard().at_state(500, 1000, 5);
        let tx = book
            .sale(&SaleSpec::new(&book, SPORE))
            .tx
            .with_witness(0, &WitnessArgs::default());

        let err = validate(&tx, &book.config).unwrap_err();
        assert!(matches!(
            err,
            AccountBookError::MissingWitness {
                slot: "output_type"
            }
        ));
        assert_eq!(err.exit_code(), 3);
    }
}
