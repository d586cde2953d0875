//! PostgreSQL adapter for LoanRepository
//!
//! Opening and closing a loan also moves a copy on or off the shelf, so both
//! run inside a transaction with a guarded `UPDATE` on the book row.
//! Opening also holds a per-patron advisory lock while it counts the patron's
//! outstanding loans, so concurrent borrows cannot both slip under the limit.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, Set, Statement,
    TransactionTrait,
};

use crate::domain::entities::{BookId, LateFee, Loan, LoanId, LoanStatus, NewLoan, PatronId};
use crate::domain::ports::LoanRepository;
use crate::entity::{books, loans};
use crate::error::DomainError;

/// PostgreSQL implementation of LoanRepository
pub struct PostgresLoanRepository {
    db: DatabaseConnection,
}

impl PostgresLoanRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn begin(&self) -> Result<DatabaseTransaction, DomainError> {
        self.db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }
}

/// First key of the two-key advisory lock; the second is the card number
const PATRON_LOCK_CLASS: i32 = 0x4c4f_414e;

/// Serialize loan openings of one patron until the transaction ends
async fn lock_patron(txn: &DatabaseTransaction, patron_id: &PatronId) -> Result<(), DomainError> {
    txn.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT pg_advisory_xact_lock($1, $2)",
        [PATRON_LOCK_CLASS.into(), patron_id.lock_key().into()],
    ))
    .await
    .map_err(|e| DomainError::Database(e.to_string()))?;

    Ok(())
}

async fn rollback(txn: DatabaseTransaction) -> Result<(), DomainError> {
    txn.rollback()
        .await
        .map_err(|e| DomainError::Database(e.to_string()))
}

#[async_trait]
impl LoanRepository for PostgresLoanRepository {
    async fn find_outstanding(
        &self,
        patron_id: &PatronId,
        book_id: &BookId,
    ) -> Result<Option<Loan>, DomainError> {
        let result = loans::Entity::find()
            .filter(loans::Column::PatronId.eq(patron_id.as_str()))
            .filter(loans::Column::BookId.eq(book_id.0))
            .filter(loans::Column::ReturnDate.is_null())
            .order_by_desc(loans::Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Loan::try_from).transpose()
    }

    async fn find_outstanding_by_patron(
        &self,
        patron_id: &PatronId,
    ) -> Result<Vec<Loan>, DomainError> {
        let results = loans::Entity::find()
            .filter(loans::Column::PatronId.eq(patron_id.as_str()))
            .filter(loans::Column::ReturnDate.is_null())
            .order_by_asc(loans::Column::DueDate)
            .order_by_asc(loans::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(Loan::try_from).collect()
    }

    async fn find_by_patron(&self, patron_id: &PatronId) -> Result<Vec<Loan>, DomainError> {
        let results = loans::Entity::find()
            .filter(loans::Column::PatronId.eq(patron_id.as_str()))
            .order_by_desc(loans::Column::BorrowDate)
            .order_by_desc(loans::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(Loan::try_from).collect()
    }

    async fn open(&self, loan: &NewLoan, max_outstanding: usize) -> Result<Loan, DomainError> {
        let txn = self.begin().await?;
        lock_patron(&txn, &loan.patron_id).await?;

        let taken = books::Entity::update_many()
            .col_expr(
                books::Column::AvailableCopies,
                Expr::col(books::Column::AvailableCopies).sub(1),
            )
            .filter(books::Column::Id.eq(loan.book_id.0))
            .filter(books::Column::AvailableCopies.gt(0))
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if taken.rows_affected == 0 {
            let exists = books::Entity::find_by_id(loan.book_id.0)
                .one(&txn)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?
                .is_some();
            rollback(txn).await?;

            return Err(if exists {
                DomainError::Conflict(format!("Book {} has no available copies", loan.book_id))
            } else {
                DomainError::NotFound(format!("Book {} not found", loan.book_id))
            });
        }

        let outstanding = loans::Entity::find()
            .filter(loans::Column::PatronId.eq(loan.patron_id.as_str()))
            .filter(loans::Column::ReturnDate.is_null())
            .count(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;
        if outstanding >= max_outstanding as u64 {
            rollback(txn).await?;
            return Err(DomainError::LimitReached(format!(
                "Patron {} already holds {} outstanding loans",
                loan.patron_id, outstanding
            )));
        }

        let model = loans::ActiveModel {
            id: NotSet,
            patron_id: Set(loan.patron_id.as_str().to_string()),
            book_id: Set(loan.book_id.0),
            borrow_date: Set(loan.borrowed_on),
            due_date: Set(loan.due_on),
            return_date: Set(None),
            fee_amount: Set(None),
            days_overdue: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Loan::try_from(model)
    }

    async fn close(
        &self,
        id: &LoanId,
        returned_on: NaiveDate,
        fee: &LateFee,
    ) -> Result<Loan, DomainError> {
        let txn = self.begin().await?;

        let closed = loans::Entity::update_many()
            .col_expr(loans::Column::ReturnDate, Expr::value(returned_on))
            .col_expr(loans::Column::FeeAmount, Expr::value(fee.amount))
            .col_expr(
                loans::Column::DaysOverdue,
                Expr::value(i32::try_from(fee.days_overdue).unwrap_or(i32::MAX)),
            )
            .filter(loans::Column::Id.eq(id.0))
            .filter(loans::Column::ReturnDate.is_null())
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let model = loans::Entity::find_by_id(id.0)
            .one(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let model = match (closed.rows_affected, model) {
            (_, None) => {
                rollback(txn).await?;
                return Err(DomainError::NotFound(format!("Loan {} not found", id)));
            }
            (0, Some(_)) => {
                rollback(txn).await?;
                return Err(DomainError::Conflict(format!(
                    "Loan {} has already been returned",
                    id
                )));
            }
            (_, Some(model)) => model,
        };

        // Never above the total, even if the row was edited by hand
        books::Entity::update_many()
            .col_expr(
                books::Column::AvailableCopies,
                Expr::col(books::Column::AvailableCopies).add(1),
            )
            .filter(books::Column::Id.eq(model.book_id))
            .filter(
                Expr::col(books::Column::AvailableCopies).lt(Expr::col(books::Column::TotalCopies)),
            )
            .exec(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Loan::try_from(model)
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<loans::Model> for Loan {
    type Error = DomainError;

    fn try_from(model: loans::Model) -> Result<Self, Self::Error> {
        let patron_id = PatronId::parse(&model.patron_id).map_err(|_| {
            DomainError::Database(format!(
                "Loan {} has malformed patron id {:?}",
                model.id, model.patron_id
            ))
        })?;

        let status = match model.return_date {
            None => LoanStatus::Outstanding,
            Some(returned_on) => LoanStatus::Returned {
                returned_on,
                fee: LateFee {
                    amount: model.fee_amount.unwrap_or(Decimal::ZERO),
                    days_overdue: model.days_overdue.map(i64::from).unwrap_or(0),
                },
            },
        };

        Ok(Loan {
            id: LoanId(model.id),
            patron_id,
            book_id: BookId(model.book_id),
            borrowed_on: model.borrow_date,
            due_on: model.due_date,
            status,
        })
    }
}
