use std::cell::{ Cell, RefCell };
use std::rc::Rc ;
use design_host::{ DesignerTransaction, TransactionStatus };
use design_host::events::TransactionClose ;
use crate::fixtures ;

fn describe( args: &TransactionClose ) -> String {
	format!( "committed={} last={}", args.committed, args.last_transaction )
}

#[test]
fn close_raises_closing_then_closed() {

	let ( host, surface ) = fixtures::setup();
	host.events().transaction_opening.subscribe( fixtures::recorder( &surface.log, "opening", | _: &() | String::new() ));
	host.events().transaction_opened.subscribe( fixtures::recorder( &surface.log, "opened", | _: &() | String::new() ));
	host.events().transaction_closing.subscribe( fixtures::recorder( &surface.log, "closing", describe ));
	host.events().transaction_closed.subscribe( fixtures::recorder( &surface.log, "closed", describe ));

	let outer = host.create_transaction( Some( "Outer" )).expect( "Failed to open outer transaction" );
	let inner = host.create_transaction( Some( "Inner" )).expect( "Failed to open inner transaction" );
	inner.cancel().expect( "Failed to cancel inner transaction" );
	outer.commit().expect( "Failed to commit outer transaction" );

	assert_eq!( fixtures::entries( &surface.log ), vec![
		"opening ", "opened ",
		"opening ", "opened ",
		"closing committed=false last=false", "closed committed=false last=false",
		"closing committed=true last=true", "closed committed=true last=true",
	]);

}

#[test]
fn host_reports_closing_state_to_handlers() {

	let ( host, _surface ) = fixtures::setup();
	let observed = Rc::new( RefCell::new( Vec::new() ));
	let observed_in_handler = Rc::clone( &observed );
	host.events().transaction_closing.subscribe( move | host, _ | {
		observed_in_handler.borrow_mut().push(( host.is_closing_transaction(), host.in_transaction(), host.transaction_description() ));
		Ok(())
	});

	let transaction = host.create_transaction( Some( "Only" )).expect( "Failed to open transaction" );
	transaction.commit().expect( "Failed to commit" );

	assert_eq!( *observed.borrow(), vec![( true, true, None )]);
	assert!( !host.is_closing_transaction() );
	assert!( !host.in_transaction() );

}

#[test]
fn failing_closing_handler_still_closes_transaction() {

	let ( host, _surface ) = fixtures::setup();
	let closed = Rc::new( Cell::new( false ));
	let closed_in_handler = Rc::clone( &closed );
	host.events().transaction_closing.subscribe(| _, _ | Err( fixtures::failure( "closing handler failed" )));
	host.events().transaction_closed.subscribe( move | _, _ | { closed_in_handler.set( true ); Ok(()) });

	let transaction = host.create_transaction( None ).expect( "Failed to open transaction" );
	assert!( transaction.commit().is_err() );

	assert_eq!( transaction.status(), TransactionStatus::Committed );
	assert!( !closed.get() );
	assert!( !host.in_transaction() );
	assert!( !host.is_closing_transaction() );

}

#[test]
fn closed_handler_may_close_enclosing_transaction() {

	let ( host, surface ) = fixtures::setup();
	let outer = host.create_transaction( Some( "Outer" )).expect( "Failed to open outer transaction" );
	let inner = host.create_transaction( Some( "Inner" )).expect( "Failed to open inner transaction" );
	let pending: Rc<RefCell<Option<DesignerTransaction>>> = Rc::new( RefCell::new( Some( outer )));
	let pending_in_handler = Rc::clone( &pending );
	host.events().transaction_closed.subscribe( fixtures::recorder( &surface.log, "closed", describe ));
	host.events().transaction_closed.subscribe( move | host, _ | {
		let outer = pending_in_handler.borrow_mut().take();
		if let Some( outer ) = outer {
			assert!( host.is_closing_transaction() );
			outer.commit()?;
			assert!( host.is_closing_transaction() );
		}
		Ok(())
	});

	inner.commit().expect( "Failed to commit inner transaction" );

	assert!( pending.borrow().is_none() );
	assert!( !host.in_transaction() );
	assert!( !host.is_closing_transaction() );
	assert_eq!( fixtures::entries( &surface.log ), vec![
		"closed committed=true last=false",
		"closed committed=true last=true",
	]);

}

#[test]
fn work_during_close_is_still_in_transaction() {

	let ( host, _surface ) = fixtures::setup();
	let root = fixtures::add_root( &host );
	let seen = Rc::new( Cell::new( false ));
	let seen_in_handler = Rc::clone( &seen );
	host.events().component_changed.subscribe( move | host, _ | { seen_in_handler.set( host.in_transaction() ); Ok(()) });
	let root_in_handler = root.clone();
	host.events().transaction_closing.subscribe( move | host, _ | host.on_component_changed( &root_in_handler, None, None, None ));

	host.create_transaction( None ).expect( "Failed to open transaction" )
		.commit().expect( "Failed to commit" );

	assert!( seen.get() );

}
