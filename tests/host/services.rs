use std::any::Any ;
use std::rc::Rc ;
use design_host::{ DesignerHost, SelectionService, ServiceContainer, ServiceProviderExt, Surface };
use crate::fixtures::{ self, RecordingSelection, TestSurface };

fn same_service( a: &Rc<dyn SelectionService>, b: &Rc<RecordingSelection> ) -> bool {
	Rc::as_ptr( a ).cast::<()>() == Rc::as_ptr( b ).cast::<()>()
}

#[test]
fn host_services_shadow_surface_services() {

	let ( host, surface ) = fixtures::setup();
	let from_surface = Rc::new( RecordingSelection::default() );
	let from_host = Rc::new( RecordingSelection::default() );
	surface.services.add_service::<dyn SelectionService>( Rc::clone( &from_surface ) as Rc<dyn SelectionService> );

	let resolved = host.get_service::<dyn SelectionService>().expect( "Surface service not visible" );
	assert!( same_service( &resolved, &from_surface ));

	host.add_service::<dyn SelectionService>( Rc::clone( &from_host ) as Rc<dyn SelectionService> );
	let resolved = host.get_service::<dyn SelectionService>().expect( "Host service not visible" );
	assert!( same_service( &resolved, &from_host ));

	assert!( host.remove_service::<dyn SelectionService>() );
	assert!( !host.remove_service::<dyn SelectionService>() );
	let resolved = host.get_service::<dyn SelectionService>().expect( "Surface service not visible" );
	assert!( same_service( &resolved, &from_surface ));

}

#[test]
fn builder_registers_services_on_host() {

	fixtures::init_tracing();
	let selection = Rc::new( RecordingSelection::default() );
	let host = DesignerHost::builder( TestSurface::new() as Rc<dyn Surface> )
		.with_service::<dyn SelectionService>( Rc::clone( &selection ) as Rc<dyn SelectionService> )
		.build();

	let resolved = host.get_service::<dyn SelectionService>().expect( "Builder service not visible" );
	assert!( same_service( &resolved, &selection ));

}

#[test]
fn sites_resolve_services_through_host() {

	let ( host, surface ) = fixtures::setup();
	let selection = Rc::new( RecordingSelection::default() );
	surface.services.add_service::<dyn SelectionService>( Rc::clone( &selection ) as Rc<dyn SelectionService> );
	let root = fixtures::add_root( &host );
	let site = host.site( &root ).expect( "Root is not sited" );

	let resolved = site.get_service::<dyn SelectionService>().expect( "Site does not see host services" );
	assert!( same_service( &resolved, &selection ));
	assert!( host.container().get_service::<dyn SelectionService>().is_some() );

}

#[test]
fn services_are_keyed_by_registered_type() {

	let services = ServiceContainer::new();
	services.add_service::<RecordingSelection>( Rc::new( RecordingSelection::default() ));

	assert!( services.contains::<RecordingSelection>() );
	assert!( !services.contains::<dyn SelectionService>() );
	assert!( services.get_service::<dyn SelectionService>().is_none() );
	assert!( services.get_service::<RecordingSelection>().is_some() );

}

#[test]
fn disposed_host_no_longer_sees_surface_services() {

	let ( host, surface ) = fixtures::setup();
	surface.services.add_service::<dyn SelectionService>( Rc::new( RecordingSelection::default() ));
	host.add_service::<String>( Rc::new( "host local".to_string() ));

	host.dispose_host().expect( "Failed to dispose host" );

	assert!( host.get_service::<dyn SelectionService>().is_none() );
	assert_eq!( host.get_service::<String>().as_deref().map( String::as_str ), Some( "host local" ));

}

#[test]
fn site_dictionary_stores_values_by_key() {

	let ( host, _surface ) = fixtures::setup();
	let root = fixtures::add_root( &host );
	let site = host.site( &root ).expect( "Root is not sited" );
	let value: Rc<dyn Any> = Rc::new( 42_u32 );

	site.set_value( "answer", Some( Rc::clone( &value )));
	assert_eq!( site.get_value( "answer" ).and_then(| stored | stored.downcast_ref::<u32>().copied() ), Some( 42 ));
	assert_eq!( site.get_key( &value ).as_deref(), Some( "answer" ));
	assert!( site.get_key( &( Rc::new( 42_u32 ) as Rc<dyn Any> )).is_none() );

	site.set_value( "answer", None );
	assert!( site.get_value( "answer" ).is_none() );

}
