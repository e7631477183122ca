//! # Eligibility Exploits
//!
//! Who may sell into the book and who may draw from it.

#[cfg(test)]
mod tests {
    use crate::fixtures::{buyer_lock, hash_of, BookFixture, SaleSpec, WithdrawalSpec};
    use sb_account_book::adapters::InMemoryTransaction;
    use sb_account_book::domain::LedgerKey;
    use sb_account_book::{program_entry, validate, ErrorKind};
    use sb_types::{AccountBookData, Record, WithdrawalBuyer, WitnessArgs};

    const SPORE: [u8; 32] = [0x5D; 32];

    fn live_book() -> BookFixture {
        BookFixture::standard().at_state(600, 1100, 6)
    }

    fn rejected_as(book: &BookFixture, tx: &InMemoryTransaction) -> ErrorKind {
        validate(tx, &book.config).unwrap_err().kind()
    }

    // =============================================================================
    // SELLING
    // =============================================================================

    #[test]
    fn test_wrong_tier_spore_rejected() {
        let book = live_book();
        let plan = SaleSpec {
            content: b"level:01".to_vec(),
            ..SaleSpec::new(&book, SPORE)
        };
        let step = book.sale(&plan);
        assert_eq!(rejected_as(&book, &step.tx), ErrorKind::EligibilityViolation);
        assert_eq!(program_entry(&step.tx, &book.config), 10);
    }

    #[test]
    fn test_spore_from_other_cluster_rejected() {
        let book = live_book();
        let plan = SaleSpec {
            cluster_id: Some(vec![0xEE; 32]),
            ..SaleSpec::new(&book, SPORE)
        };
        assert_eq!(
            rejected_as(&book, &book.sale(&plan).tx),
            ErrorKind::EligibilityViolation
        );
    }

    #[test]
    fn test_spore_without_cluster_rejected() {
        let book = live_book();
        let plan = SaleSpec {
            cluster_id: None,
            ..SaleSpec::new(&book, SPORE)
        };
        assert_eq!(
            rejected_as(&book, &book.sale(&plan).tx),
            ErrorKind::EligibilityViolation
        );
    }

    #[test]
    fn test_listing_for_other_book_rejected() {
        let book = live_book();
        let plan = SaleSpec {
            listed_book: Some([0x42; 32]),
            ..SaleSpec::new(&book, SPORE)
        };
        assert_eq!(
            rejected_as(&book, &book.sale(&plan).tx),
            ErrorKind::EligibilityViolation
        );
    }

    #[test]
    fn test_update_without_marker_rejected() {
        let book = live_book();
        let witness = AccountBookData {
            proof: Vec::new(),
            total_income_udt: book.income,
            withdrawn_udt: None,
        };
        let tx = InMemoryTransaction::new(book.script.clone())
            .with_input(book.book_cell(&book.data))
            .with_output(book.book_cell(&book.data))
            .with_witness(0, &WitnessArgs::with_output_type(witness.encode()));
        assert_eq!(rejected_as(&book, &tx), ErrorKind::EligibilityViolation);
    }

    // =============================================================================
    // WITHDRAWAL
    // =============================================================================

    #[test]
    fn test_spore_sold_here_takes_no_buyer_share() {
        // A spore sold through the book carries the book's own tier.
        let book = live_book();
        let book = book.sale(&SaleSpec::new(&book, SPORE)).next;
        let step = book.withdrawal(&WithdrawalSpec::spore(SPORE, 2, 210, 210));
        assert_eq!(rejected_as(&book, &step.tx), ErrorKind::EligibilityViolation);
    }

    #[test]
    fn test_tier_above_book_rejected() {
        let book = live_book();
        let step = book.withdrawal(&WithdrawalSpec::spore(SPORE, 3, 180, 180));
        assert_eq!(rejected_as(&book, &step.tx), ErrorKind::EligibilityViolation);
    }

    #[test]
    fn test_spore_claim_from_other_cluster_rejected() {
        let book = live_book();
        let mut plan = WithdrawalSpec::spore(SPORE, 0, 180, 180);
        if let WithdrawalBuyer::Spore(spore) = &mut plan.buyer {
            spore.cluster_id = [0xC2; 32];
        }
        assert_eq!(
            rejected_as(&book, &book.withdrawal(&plan).tx),
            ErrorKind::EligibilityViolation
        );
    }

    #[test]
    fn test_author_impostor_rejected() {
        let book = live_book().with_entry(LedgerKey::Author, 50);
        let plan = WithdrawalSpec {
            signer: buyer_lock(),
            ..WithdrawalSpec::author(120, 70)
        };
        assert_eq!(
            rejected_as(&book, &book.withdrawal(&plan).tx),
            ErrorKind::EligibilityViolation
        );
    }

    #[test]
    fn test_unknown_stakeholder_rejected() {
        let book = live_book();
        let plan = WithdrawalSpec {
            buyer: WithdrawalBuyer::Stakeholder(hash_of(&buyer_lock())),
            signer: buyer_lock(),
            payee: buyer_lock(),
            ..WithdrawalSpec::author(120, 120)
        };
        assert_eq!(
            rejected_as(&book, &book.withdrawal(&plan).tx),
            ErrorKind::EligibilityViolation
        );
    }
}
