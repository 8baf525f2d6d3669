use lightrig::data_structures::scene::Scene;

fn main() -> anyhow::Result<()> {
    lightrig::app::run(Scene::demo())
}
