use std::cell::Cell ;
use std::rc::Rc ;
use design_host::events::TransactionClose ;
use crate::fixtures ;

#[test]
fn dropping_open_transaction_cancels_it() {

	let ( host, surface ) = fixtures::setup();
	host.events().transaction_closed.subscribe( fixtures::recorder( &surface.log, "closed", | args: &TransactionClose |
		format!( "committed={}", args.committed )
	));

	{
		let _transaction = host.create_transaction( Some( "Scoped" )).expect( "Failed to open transaction" );
		assert!( host.in_transaction() );
	}

	assert!( !host.in_transaction() );
	assert_eq!( fixtures::entries( &surface.log ), vec![ "closed committed=false" ]);

}

#[test]
fn dropping_closed_transaction_raises_nothing() {

	let ( host, _surface ) = fixtures::setup();
	let closes = Rc::new( Cell::new( 0 ));
	let closes_in_handler = Rc::clone( &closes );
	host.events().transaction_closed.subscribe( move | _, _ | { closes_in_handler.set( closes_in_handler.get() + 1 ); Ok(()) });

	let transaction = host.create_transaction( None ).expect( "Failed to open transaction" );
	transaction.commit().expect( "Failed to commit" );
	drop( transaction );

	assert_eq!( closes.get(), 1 );

}

#[test]
fn dropping_outer_transaction_before_inner_is_logged_not_fatal() {

	let ( host, _surface ) = fixtures::setup();
	let outer = host.create_transaction( Some( "Outer" )).expect( "Failed to open outer transaction" );
	let inner = host.create_transaction( Some( "Inner" )).expect( "Failed to open inner transaction" );

	// The cancel is rejected because the inner transaction is still open.
	drop( outer );
	assert_eq!( host.transaction_description().as_deref(), Some( "Inner" ));

	inner.commit().expect( "Failed to commit inner transaction" );
	assert!( host.in_transaction() );
	assert_eq!( host.transaction_description().as_deref(), Some( "Outer" ));

}

#[test]
fn transaction_outliving_host_closes_quietly() {

	let ( host, _surface ) = fixtures::setup();
	let transaction = host.create_transaction( Some( "Orphan" )).expect( "Failed to open transaction" );

	drop( host );

	transaction.commit().expect( "Closing after the host is gone must be a no-op" );
	transaction.cancel().expect( "Closing after the host is gone must be a no-op" );

}

#[test]
fn transaction_handles_report_their_description() {

	let ( host, _surface ) = fixtures::setup();
	let transaction = host.create_transaction( Some( "Align left" )).expect( "Failed to open transaction" );

	assert_eq!( transaction.description(), "Align left" );
	assert!( transaction.is_open() );
	assert!( format!( "{:?}", transaction ).contains( "Align left" ));

}
