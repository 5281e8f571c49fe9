use std::rc::Rc ;
use design_host::{ DesignerError, DesignerHost, SelectionService, Surface };
use crate::fixtures::{ self, RecordingSelection, TestComponent, TestLoader, TestSurface };

#[test]
fn reload_without_loader_does_nothing() {

	let ( host, surface ) = fixtures::setup();
	fixtures::add_root( &host );

	host.reload().expect( "Failed to reload" );

	assert_eq!( host.components().len(), 1 );
	assert!( fixtures::entries( &surface.log ).is_empty() );

}

#[test]
fn reload_flushes_unloads_and_loads_again() {

	let ( host, surface ) = fixtures::setup();
	let loader = Rc::new( TestLoader::form( &surface.log ));
	host.begin_load( Rc::clone( &loader ) as Rc<dyn design_host::DesignerLoader> ).expect( "Failed to load" );
	let before = host.component( "button1" ).expect( "Loader did not create button1" );
	surface.log.borrow_mut().clear();

	host.reload().expect( "Failed to reload" );

	assert_eq!( loader.loads.get(), 2 );
	let after = host.component( "button1" ).expect( "Reload did not recreate button1" );
	assert_ne!( before, after );
	assert_eq!( host.components().len(), 3 );
	let flush = fixtures::position( &surface.log, "loader flush" );
	let unloaded = fixtures::position( &surface.log, "on_unloaded" );
	let begin = fixtures::position( &surface.log, "begin_load" );
	assert!( flush < unloaded && unloaded < begin );

}

#[test]
fn reload_restores_selection_by_name() {

	let ( host, surface ) = fixtures::setup();
	let selection = Rc::new( RecordingSelection::default() );
	surface.services.add_service::<dyn SelectionService>( Rc::clone( &selection ) as Rc<dyn SelectionService> );
	host.begin_load( Rc::new( TestLoader::form( &surface.log ))).expect( "Failed to load" );
	let button = host.component( "button1" ).expect( "Loader did not create button1" );
	let label = host.component( "label1" ).expect( "Loader did not create label1" );
	selection.set_selected_components( vec![ button.clone(), label ]);

	host.reload().expect( "Failed to reload" );

	let selected = selection.selected_components();
	assert_eq!( selected.len(), 2 );
	assert!( !selected.contains( &button ));
	assert_eq!( selected, vec![
		host.component( "button1" ).expect( "Reload did not recreate button1" ),
		host.component( "label1" ).expect( "Reload did not recreate label1" ),
	]);

}

fn fragile_setup( can_reload_with_errors: bool ) -> ( DesignerHost, Rc<TestSurface>, Rc<TestLoader> ) {
	fixtures::init_tracing();
	let surface = TestSurface::new();
	let host = DesignerHost::builder( Rc::clone( &surface ) as Rc<dyn Surface> )
		.can_reload_with_errors( can_reload_with_errors )
		.build();
	surface.factory( "MyApp.Fragile", | _, component_type | Ok( Some( TestComponent::new( component_type.name() ).failing_dispose().handle() )));
	let loader = Rc::new( TestLoader::form( &surface.log ).with_component( "MyApp.Fragile", "fragile1" ));
	host.begin_load( Rc::clone( &loader ) as Rc<dyn design_host::DesignerLoader> ).expect( "Failed to load" );
	( host, surface, loader )
}

#[test]
fn reload_stops_on_unload_errors() {

	let ( host, _surface, loader ) = fragile_setup( false );
	assert!( !host.set_ignore_errors_during_reload( true ));
	assert!( !host.ignore_errors_during_reload() );

	assert!( matches!( host.reload(), Err( DesignerError::Unload( _ ))));

	assert_eq!( loader.loads.get(), 1 );
	assert!( host.components().is_empty() );

}

#[test]
fn failed_reload_discards_saved_selection() {

	let ( host, surface, loader ) = fragile_setup( false );
	let selection = Rc::new( RecordingSelection::default() );
	surface.services.add_service::<dyn SelectionService>( Rc::clone( &selection ) as Rc<dyn SelectionService> );
	let button = host.component( "button1" ).expect( "Loader did not create button1" );
	selection.set_selected_components( vec![ button ]);

	assert!( matches!( host.reload(), Err( DesignerError::Unload( _ ))));
	selection.set_selected_components( Vec::new() );
	host.begin_load( Rc::clone( &loader ) as Rc<dyn design_host::DesignerLoader> ).expect( "Failed to load again" );

	assert_eq!( loader.loads.get(), 2 );
	assert!( selection.selected_components().is_empty() );

}

#[test]
fn reload_may_ignore_unload_errors() {

	let ( host, _surface, loader ) = fragile_setup( true );
	assert!( host.set_ignore_errors_during_reload( true ));

	host.reload().expect( "Unload errors should be ignored" );

	assert_eq!( loader.loads.get(), 2 );
	assert_eq!( host.components().len(), 4 );

}

#[test]
fn reload_keeps_the_bound_loader() {

	let ( host, surface ) = fixtures::setup();
	let loader: Rc<dyn design_host::DesignerLoader> = Rc::new( TestLoader::form( &surface.log ));
	host.begin_load( Rc::clone( &loader )).expect( "Failed to load" );

	host.reload().expect( "Failed to reload" );
	host.reload().expect( "Failed to reload again" );

	assert!( host.loader().is_some_and(| bound | Rc::ptr_eq( &bound, &loader )));
	assert_eq!( host.root_component_class_name().as_deref(), Some( "Form1" ));

}
