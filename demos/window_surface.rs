use wgpu_glue::{Framework, SurfaceDescriptor};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

fn main() {
    let _ = pretty_env_logger::try_init();

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("wgpu-glue window_surface demo")
        .build(&event_loop)
        .expect("failed to open a window");

    let fw = Framework::from_env();

    // aborts on a window the target platform has no surface for
    let desc = SurfaceDescriptor::from_window(&window);
    println!("descriptor: {:?}", desc);

    // Safety: the window is moved into the event loop closure below together
    // with the surface, so it outlives the surface.
    let surface = unsafe { fw.create_surface(&desc) }.expect("failed to create surface");

    let adapter = fw
        .request_adapter(Some(&surface))
        .expect("couldn't find a suitable graphics adapter");
    let (_device, _queue) = fw
        .request_device(&adapter)
        .expect("failed to open a device");

    let caps = surface.get_capabilities(&adapter);
    match caps.formats.first() {
        Some(format) => println!("preferred surface format: {:?}", format),
        None => println!("surface is not presentable with {}", adapter.get_info().name),
    }

    event_loop.run(move |event, _, control_flow| {
        let _ = (&window, &surface);
        *control_flow = ControlFlow::Wait;

        if let Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } = event
        {
            *control_flow = ControlFlow::Exit;
        }
    });
}
