use std::rc::Rc ;
use design_host::{ DesignerError, DesignerEventService, ExtenderProviderService };
use crate::fixtures::{ self, RecordingExtenders, TestComponent, TestDesignerEvents, TestLoader };

#[test]
fn dispose_host_disposes_loader_and_unloads() {

	let ( host, surface ) = fixtures::setup();
	host.begin_load( Rc::new( TestLoader::form( &surface.log ))).expect( "Failed to load" );
	surface.log.borrow_mut().clear();

	host.dispose_host().expect( "Failed to dispose host" );

	assert_eq!( fixtures::position( &surface.log, "loader dispose" ), 0 );
	assert!( fixtures::position( &surface.log, "on_unloaded" ) > 0 );
	assert!( host.components().is_empty() );
	assert!( host.loader().is_none() );
	assert!( host.root_component().is_none() );

}

#[test]
fn disposed_host_is_detached_from_surface() {

	let ( host, surface ) = fixtures::setup();
	host.dispose_host().expect( "Failed to dispose host" );

	assert!( matches!( host.unload(), Err( DesignerError::Disposed )));
	assert!( matches!( host.activate(), Err( DesignerError::Disposed )));
	assert!( matches!( host.begin_load( Rc::new( TestLoader::form( &surface.log ))), Err( DesignerError::Disposed )));
	assert!( host.loader().is_none() );
	match host.add( TestComponent::new( "MyApp.Form" ).handle(), Some( "Form1" )) {
		Err( DesignerError::Disposed ) => {}
		value => panic!( "Expected Disposed error, found: {:#?}", value ),
	}
	assert!( host.components().is_empty() );

}

#[test]
fn dispose_host_without_loader_releases_components_silently() {

	let ( host, surface ) = fixtures::setup();
	let root = fixtures::add_root( &host );
	let button = fixtures::add_child( &host, "MyApp.Button", "button1" );
	let root_site = host.site( &root ).expect( "Root is not sited" );
	fixtures::record_component_events( &host, &surface.log );
	surface.log.borrow_mut().clear();

	host.dispose_host().expect( "Failed to dispose host" );

	assert!( host.components().is_empty() );
	assert!( host.designers().is_empty() );
	assert!( root_site.is_disposed() );
	assert_eq!( fixtures::disposed( &root ), 1 );
	assert_eq!( fixtures::disposed( &button ), 1 );
	assert!( !fixtures::entries( &surface.log ).iter().any(| entry | entry.starts_with( "remov" )));
	let button_designer = fixtures::position( &surface.log, "dispose designer MyApp.Button" );
	let root_designer = fixtures::position( &surface.log, "dispose designer MyApp.Form" );
	assert!( button_designer < root_designer );

}

#[test]
fn dispose_host_clears_event_handlers() {

	let ( host, _surface ) = fixtures::setup();
	host.events().component_added.subscribe(| _, _ | Ok(()));
	host.events().transaction_closed.subscribe(| _, _ | Ok(()));

	host.dispose_host().expect( "Failed to dispose host" );

	assert!( host.events().component_added.is_empty() );
	assert!( host.events().transaction_closed.is_empty() );

}

#[test]
fn dispose_host_reports_teardown_failures() {

	let ( host, _surface ) = fixtures::setup();
	fixtures::add_root( &host );
	let timer = TestComponent::new( "MyApp.Timer" ).failing_dispose().handle();
	host.add( timer, Some( "timer1" )).expect( "Failed to add timer" );

	match host.dispose_host() {
		Err( DesignerError::Unload( errors )) => assert_eq!( errors.len(), 1 ),
		value => panic!( "Expected Unload error, found: {:#?}", value ),
	}
	assert!( host.components().is_empty() );
	assert!( matches!( host.unload(), Err( DesignerError::Disposed )));

}

#[test]
fn dispose_host_withdraws_registrations() {

	let ( host, surface ) = fixtures::setup();
	let extenders = Rc::new( RecordingExtenders::default() );
	let designer_events = Rc::new( TestDesignerEvents::default() );
	surface.services.add_service::<dyn ExtenderProviderService>( Rc::clone( &extenders ) as Rc<dyn ExtenderProviderService> );
	surface.services.add_service::<dyn DesignerEventService>( Rc::clone( &designer_events ) as Rc<dyn DesignerEventService> );
	let loader = TestLoader { extender: true, ..TestLoader::form( &surface.log ) };
	host.begin_load( Rc::new( loader )).expect( "Failed to load" );
	assert_eq!( extenders.loaders(), 1 );
	assert_eq!( designer_events.subscribers(), 1 );

	host.dispose_host().expect( "Failed to dispose host" );

	assert_eq!( extenders.loaders(), 0 );
	assert_eq!( designer_events.subscribers(), 0 );

}
