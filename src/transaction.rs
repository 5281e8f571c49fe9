//! Nestable units of work.
//!
//! Transactions batch the notifications caused by a multi-step mutation. They
//! nest freely but must close in strict LIFO order: only the innermost open
//! transaction may commit or cancel.

use std::cell::{ Cell, RefCell };
use std::rc::{ Rc, Weak };
use tracing::{ debug, error };

use crate::{ DesignerError, DesignerHost };
use crate::events::TransactionClose ;
use crate::host::{ HostInner, HostState };



/// Where a transaction is in its lifecycle.
#[derive( Copy, Clone, Eq, PartialEq, Hash, Debug )]
pub enum TransactionStatus {
	Open,
	Committed,
	Canceled,
}

pub(crate) struct TransactionInner {
	description: String,
	/// Cleared once the transaction closes, which makes closing idempotent.
	host: RefCell<Weak<HostInner>>,
	status: Cell<TransactionStatus>,
}

impl TransactionInner {

	#[inline] pub(crate) fn description( &self ) -> &str { &self.description }

	pub(crate) fn close( self: &Rc<Self>, committed: bool ) -> Result<(), DesignerError> {

		if self.status.get() != TransactionStatus::Open { return Ok(()) }
		let host = self.host.borrow().upgrade();
		let Some( host ) = host.map( DesignerHost::from_inner ) else { return Ok(()) };

		if let Some( innermost ) = host.innermost_transaction() {
			if !Rc::ptr_eq( &innermost, self ) {
				return Err( DesignerError::NestedTransaction {
					closing: self.description.clone(),
					innermost: innermost.description.clone(),
				})
			}
		}

		// A closing handler may itself close the next transaction down.
		let was_closing = host.state().contains( HostState::CLOSING_TRANSACTION );
		host.insert_state( HostState::CLOSING_TRANSACTION );
		host.pop_transaction();
		self.status.set( match committed {
			true => TransactionStatus::Committed,
			false => TransactionStatus::Canceled,
		});

		let args = TransactionClose { committed, last_transaction: !host.has_open_transactions() };
		let raised = host.events().transaction_closing.raise( &host, &args )
			.and_then(|()| host.events().transaction_closed.raise( &host, &args ));

		if !was_closing { host.remove_state( HostState::CLOSING_TRANSACTION ) }
		self.host.replace( Weak::new() );
		debug!( description = %self.description, committed, last = args.last_transaction, "transaction closed" );
		raised

	}

}

/// A scoped unit of work on a [`DesignerHost`].
///
/// Created through [`DesignerHost::create_transaction`]. Closing with
/// [`commit`]( Self::commit ) or [`cancel`]( Self::cancel ) is idempotent and
/// the first close wins. A transaction dropped while still open is canceled.
///
/// ```
/// # use std::rc::Rc ;
/// # use design_host::*;
/// # struct Surface ;
/// # impl ServiceProvider for Surface {
/// # 	fn service_entry( &self, _: std::any::TypeId ) -> Option<Rc<dyn std::any::Any>> { None }
/// # }
/// # impl design_host::Surface for Surface {
/// # 	fn create_designer( &self, _: &DesignerHost, _: &ComponentHandle, _: bool ) -> Result<Option<DesignerHandle>, DesignerError> { Ok( None ) }
/// # 	fn create_instance( &self, _: &DesignerHost, _: &ComponentType, _: &LicenseContext ) -> Result<Option<ComponentHandle>, DesignerError> { Ok( None ) }
/// # }
/// # fn main() -> Result<(), DesignerError> {
/// let host = DesignerHost::new( Rc::new( Surface ));
///
/// let outer = host.create_transaction( Some( "Move controls" ))?;
/// let inner = host.create_transaction( None )?;
/// assert_eq!( host.transaction_description().as_deref(), Some( "Untitled transaction" ));
///
/// // Closing out of order is rejected and leaves both transactions open.
/// assert!( outer.commit().is_err() );
///
/// inner.commit()?;
/// outer.commit()?;
/// assert!( !host.in_transaction() );
/// # Ok(())
/// # }
/// ```
pub struct DesignerTransaction {
	inner: Rc<TransactionInner>,
}

impl DesignerTransaction {

	pub(crate) fn open( host: &DesignerHost, description: String ) -> Result<Self, DesignerError> {

		let inner = Rc::new( TransactionInner {
			description,
			host: RefCell::new( host.downgrade() ),
			status: Cell::new( TransactionStatus::Open ),
		});
		host.push_transaction( Rc::clone( &inner ));

		let opened = host.events().transaction_opening.raise( host, &() )
			.and_then(|()| host.events().transaction_opened.raise( host, &() ));
		if let Err( error ) = opened {
			host.discard_transaction( &inner );
			inner.status.set( TransactionStatus::Canceled );
			inner.host.replace( Weak::new() );
			return Err( error )
		}

		debug!( description = %inner.description, "transaction opened" );
		Ok( Self { inner })

	}

	/// Commits the transaction.
	///
	/// # Errors
	/// - [`DesignerError::NestedTransaction`] if a transaction opened after this one is
	/// 	still open. The stack is left untouched and this transaction stays open.
	/// - Errors raised by `TransactionClosing` or `TransactionClosed` handlers. The
	/// 	transaction is closed regardless.
	pub fn commit( &self ) -> Result<(), DesignerError> { self.inner.close( true ) }

	/// Cancels the transaction.
	///
	/// # Errors
	/// Same as [`commit`]( Self::commit ).
	pub fn cancel( &self ) -> Result<(), DesignerError> { self.inner.close( false ) }

	#[inline] pub fn description( &self ) -> &str { &self.inner.description }
	#[inline] pub fn status( &self ) -> TransactionStatus { self.inner.status.get() }
	#[inline] pub fn is_open( &self ) -> bool { self.status() == TransactionStatus::Open }
	#[inline] pub fn is_committed( &self ) -> bool { self.status() == TransactionStatus::Committed }
	#[inline] pub fn is_canceled( &self ) -> bool { self.status() == TransactionStatus::Canceled }

}

impl Drop for DesignerTransaction {
	fn drop( &mut self ) {
		if !self.is_open() { return }
		if let Err( err ) = self.inner.close( false ) {
			error!( description = %self.inner.description, error = %err, "failed to cancel dropped transaction" );
		}
	}
}

impl std::fmt::Debug for DesignerTransaction {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "DesignerTransaction" )
			.field( "description", &self.inner.description )
			.field( "status", &self.inner.status.get() )
			.finish()
	}
}
